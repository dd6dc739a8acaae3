// src/domain/fixtures.rs

use chrono::NaiveDate;

use super::contract::{Contract, ContractStatus};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    // Literal dates below are all valid calendar days.
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn contract(
    id: &str,
    campaign: &str,
    influencer: &str,
    email: &str,
    commission: f64,
    start: NaiveDate,
    end: NaiveDate,
    status: ContractStatus,
) -> Contract {
    Contract {
        id: id.to_string(),
        brand_id: None,
        brand_name: None,
        campaign_name: campaign.to_string(),
        influencer_name: influencer.to_string(),
        influencer_email: email.to_string(),
        commission,
        start_date: start,
        end_date: end,
        status,
        total_sales: None,
        total_commission: None,
        last_payout: None,
        max_budget: None,
    }
}

/// The six sample contracts shown in demo mode.
pub fn sample_contracts() -> Vec<Contract> {
    vec![
        Contract {
            total_sales: Some(24500.0),
            total_commission: Some(3675.0),
            last_payout: Some(date(2023, 7, 15)),
            max_budget: Some(10000.0),
            ..contract(
                "1",
                "Summer Collection Promotion",
                "Alex Johnson",
                "alex@influencer.com",
                15.0,
                date(2023, 6, 1),
                date(2023, 8, 31),
                ContractStatus::Active,
            )
        },
        Contract {
            max_budget: Some(8000.0),
            ..contract(
                "2",
                "Fall Fashion Launch",
                "Samantha Lee",
                "samantha@influencer.com",
                12.0,
                date(2023, 9, 1),
                date(2023, 11, 30),
                ContractStatus::Pending,
            )
        },
        Contract {
            max_budget: Some(15000.0),
            ..contract(
                "3",
                "Holiday Special",
                "Mike Williams",
                "mike@influencer.com",
                20.0,
                date(2023, 11, 15),
                date(2023, 12, 31),
                ContractStatus::Pending,
            )
        },
        Contract {
            total_sales: Some(35000.0),
            total_commission: Some(6300.0),
            last_payout: Some(date(2023, 6, 5)),
            max_budget: Some(12000.0),
            ..contract(
                "4",
                "Spring Collection",
                "Emma Davis",
                "emma@influencer.com",
                18.0,
                date(2023, 3, 1),
                date(2023, 5, 31),
                ContractStatus::Completed,
            )
        },
        Contract {
            total_sales: Some(2000.0),
            total_commission: Some(500.0),
            max_budget: Some(20000.0),
            ..contract(
                "5",
                "Tech Gadget Promotion",
                "Ryan Cooper",
                "ryan@influencer.com",
                25.0,
                date(2023, 7, 15),
                date(2023, 9, 15),
                ContractStatus::Failed,
            )
        },
        Contract {
            total_sales: Some(42000.0),
            total_commission: Some(6300.0),
            last_payout: Some(date(2023, 4, 5)),
            max_budget: Some(10000.0),
            ..contract(
                "6",
                "Fitness Challenge",
                "Jessica Kim",
                "jessica@influencer.com",
                15.0,
                date(2023, 1, 1),
                date(2023, 3, 31),
                ContractStatus::Completed,
            )
        },
    ]
}
