pub mod contract_form;
pub mod dashboard;
pub mod home;
pub mod login;

pub use contract_form::{contract_form_page, ContractFormVm};
pub use dashboard::{dashboard_href, dashboard_page, with_query, DashboardVm};
pub use home::home_page;
pub use login::{login_page, AuthMode, LoginForm};
