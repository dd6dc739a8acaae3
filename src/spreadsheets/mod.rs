pub mod contracts_xlsx;

pub use contracts_xlsx::export_contracts_xlsx;
