use crate::domain::{Contract, Role};
use crate::errors::ServerError;
use crate::responses::{xlsx_response, ResultResp};
use rust_xlsxwriter::{Workbook, Worksheet};

fn xlsx_err(what: &str) -> impl Fn(rust_xlsxwriter::XlsxError) -> ServerError + '_ {
    move |e| ServerError::XlsxError(format!("Failed to write {what}: {e}"))
}

fn write_opt_number(ws: &mut Worksheet, row: u32, col: u16, value: Option<f64>) -> Result<(), ServerError> {
    if let Some(v) = value {
        ws.write_number(row, col, v).map_err(xlsx_err("number"))?;
    }
    Ok(())
}

/// Workbook bytes for the given rows, in the order given.
pub fn build_contracts_workbook(rows: &[&Contract], role: Role) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let headers = [
        "Campaign",
        role.counterparty_label(),
        "Influencer Email",
        "Commission %",
        "Start Date",
        "End Date",
        "Status",
        "Total Sales",
        "Total Commission",
        "Last Payout",
        "Max Budget",
    ];

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(|e| {
                ServerError::XlsxError(format!("Failed to write header '{}': {}", header, e))
            })?;
    }

    for (i, c) in rows.iter().enumerate() {
        let r = (i + 1) as u32;

        worksheet
            .write_string(r, 0, &c.campaign_name)
            .map_err(xlsx_err("campaign"))?;
        worksheet
            .write_string(r, 1, role.counterparty(c))
            .map_err(xlsx_err("counterparty"))?;
        worksheet
            .write_string(r, 2, &c.influencer_email)
            .map_err(xlsx_err("email"))?;
        worksheet
            .write_number(r, 3, c.commission)
            .map_err(xlsx_err("commission"))?;
        worksheet
            .write_string(r, 4, c.start_date.format("%Y-%m-%d").to_string())
            .map_err(xlsx_err("start date"))?;
        worksheet
            .write_string(r, 5, c.end_date.format("%Y-%m-%d").to_string())
            .map_err(xlsx_err("end date"))?;
        worksheet
            .write_string(r, 6, c.status.label())
            .map_err(xlsx_err("status"))?;

        write_opt_number(worksheet, r, 7, c.total_sales)?;
        write_opt_number(worksheet, r, 8, c.total_commission)?;
        if let Some(paid) = c.last_payout {
            worksheet
                .write_string(r, 9, paid.format("%Y-%m-%d").to_string())
                .map_err(xlsx_err("last payout"))?;
        }
        write_opt_number(worksheet, r, 10, c.max_budget)?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {}", e)))
}

pub fn export_contracts_xlsx(rows: &[&Contract], role: Role) -> ResultResp {
    let buffer = build_contracts_workbook(rows, role)?;
    xlsx_response(buffer, "contracts.xlsx")
}
