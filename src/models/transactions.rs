use serde::{Deserialize, Serialize};

/// Every service a request form can produce. The debit/credit polarity
/// applied at settlement lives here, next to the type it depends on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Recharge,
    SendMoney,
    BankTransfer,
    BillPay,
    CashOut,
    Loan,
    Savings,
    DrivePack,
    AddMoney,
    LoanInstallment,
    RegularPack,
}

impl TransactionKind {
    /// Types that reduce the owning balance when the request is approved.
    pub fn is_debit_on_success(&self) -> bool {
        matches!(
            self,
            TransactionKind::Recharge
                | TransactionKind::DrivePack
                | TransactionKind::SendMoney
                | TransactionKind::BillPay
                | TransactionKind::LoanInstallment
                | TransactionKind::RegularPack
        )
    }

    /// Signed balance change applied when a request of this type is approved.
    /// ADD_MONEY is a deposit claim and credits; the debit set debits;
    /// every remaining type credits by default.
    pub fn settlement_delta(&self, amount_in_cents: i64) -> i64 {
        match self {
            TransactionKind::AddMoney => amount_in_cents,
            kind if kind.is_debit_on_success() => -amount_in_cents,
            _ => amount_in_cents,
        }
    }

    /// Deposit claims are the one flow submitted without the transaction PIN.
    pub fn requires_pin(&self) -> bool {
        !matches!(self, TransactionKind::AddMoney)
    }

    /// Key of the service toggle that gates this request type.
    pub fn service_key(&self) -> &'static str {
        match self {
            TransactionKind::Recharge => "topup",
            TransactionKind::SendMoney => "send_money",
            TransactionKind::BankTransfer => "banking",
            TransactionKind::BillPay => "bill_pay",
            TransactionKind::CashOut => "m_banking",
            TransactionKind::Loan | TransactionKind::LoanInstallment => "loan",
            TransactionKind::Savings => "savings",
            TransactionKind::DrivePack => "drive",
            TransactionKind::AddMoney => "add_money",
            TransactionKind::RegularPack => "regular",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Success,
    Failed,
}

impl TransactionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransactionStatus::Success | TransactionStatus::Failed)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount_in_cents: i64,
    pub status: TransactionStatus,
    pub details: String,
    pub operator: Option<String>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

/// A user-submitted service form. Field names follow the request screens;
/// which ones are read depends on the type.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RequestForm {
    pub number: Option<String>,
    pub method: Option<String>,
    pub trx_id: Option<String>,
    pub biller_type: Option<String>,
    pub bank_name: Option<String>,
    pub account_name: Option<String>,
    pub note: Option<String>,
    pub tenure_months: Option<u32>,
    pub plan: Option<String>,
    pub offer_title: Option<String>,
    pub offer_price_in_cents: Option<i64>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ServiceRequest {
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount_in_cents: i64,
    pub pin: Option<String>,
    pub operator: Option<String>,
    #[serde(default)]
    pub form: RequestForm,
}

impl ServiceRequest {
    /// Human-readable summary shown in the admin review queue. One line per
    /// service, same shape the request screens always produced.
    pub fn details(&self) -> String {
        let form = &self.form;
        let field = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());

        if let Some(title) = &form.offer_title {
            let price = form.offer_price_in_cents.unwrap_or(self.amount_in_cents);
            return format!(
                "Target: {}, Offer: {}, Price: {}",
                field(&form.number),
                title,
                format_amount(price)
            );
        }

        match self.kind {
            TransactionKind::BillPay => format!(
                "Type: {}, Bill No: {}",
                field(&form.biller_type),
                field(&form.number)
            ),
            TransactionKind::BankTransfer => format!(
                "Bank: {}, A/C: {}, Name: {}",
                field(&form.bank_name),
                field(&form.number),
                field(&form.account_name)
            ),
            TransactionKind::CashOut => format!(
                "Wallet: {}, Type: {}, No: {}",
                field(&form.method),
                field(&form.biller_type),
                field(&form.number)
            ),
            TransactionKind::SendMoney => {
                format!("To: {}, Note: {}", field(&form.number), field(&form.note))
            }
            TransactionKind::AddMoney => format!(
                "Method: {}, TrxID: {}",
                field(&form.method),
                field(&form.trx_id)
            ),
            TransactionKind::Loan => format!(
                "Tenure: {} months, Purpose: {}",
                form.tenure_months.unwrap_or(0),
                field(&form.note)
            ),
            TransactionKind::Savings => format!(
                "Plan: {}, Monthly Amount: {}",
                field(&form.plan),
                format_amount(self.amount_in_cents)
            ),
            _ => format!("Number: {}", field(&form.number)),
        }
    }
}

/// Renders cents as major units, dropping the fraction when it is zero.
pub fn format_amount(amount_in_cents: i64) -> String {
    if amount_in_cents % 100 == 0 {
        format!("{}", amount_in_cents / 100)
    } else {
        format!("{}.{:02}", amount_in_cents / 100, (amount_in_cents % 100).abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_money_credits_on_success() {
        assert_eq!(TransactionKind::AddMoney.settlement_delta(5_000), 5_000);
    }

    #[test]
    fn debit_set_debits_on_success() {
        for kind in [
            TransactionKind::Recharge,
            TransactionKind::DrivePack,
            TransactionKind::SendMoney,
            TransactionKind::BillPay,
            TransactionKind::LoanInstallment,
            TransactionKind::RegularPack,
        ] {
            assert_eq!(kind.settlement_delta(3_000), -3_000, "{:?}", kind);
        }
    }

    #[test]
    fn remaining_types_credit_by_default() {
        for kind in [
            TransactionKind::BankTransfer,
            TransactionKind::CashOut,
            TransactionKind::Loan,
            TransactionKind::Savings,
        ] {
            assert_eq!(kind.settlement_delta(3_000), 3_000, "{:?}", kind);
        }
    }

    #[test]
    fn approving_a_deposit_tops_up_the_balance() {
        let balance = 10_000_i64;
        let delta = TransactionKind::AddMoney.settlement_delta(5_000);
        assert_eq!(balance + delta, 15_000);
    }

    #[test]
    fn approving_a_recharge_draws_down_the_balance() {
        let balance = 10_000_i64;
        let delta = TransactionKind::Recharge.settlement_delta(3_000);
        assert_eq!(balance + delta, 7_000);
    }

    #[test]
    fn only_add_money_skips_the_pin() {
        assert!(!TransactionKind::AddMoney.requires_pin());
        assert!(TransactionKind::Recharge.requires_pin());
        assert!(TransactionKind::Loan.requires_pin());
    }

    #[test]
    fn pending_is_the_only_open_status() {
        assert!(!TransactionStatus::Pending.is_terminal());
        assert!(TransactionStatus::Success.is_terminal());
        assert!(TransactionStatus::Failed.is_terminal());
    }

    #[test]
    fn details_follow_the_form_shapes() {
        let mut req = ServiceRequest {
            user_id: "U12345".to_string(),
            kind: TransactionKind::SendMoney,
            amount_in_cents: 10_000,
            pin: Some("1234".to_string()),
            operator: None,
            form: RequestForm {
                number: Some("01700000000".to_string()),
                note: Some("rent".to_string()),
                ..Default::default()
            },
        };
        assert_eq!(req.details(), "To: 01700000000, Note: rent");

        req.kind = TransactionKind::AddMoney;
        req.form = RequestForm {
            method: Some("bkash".to_string()),
            trx_id: Some("TX9FK2".to_string()),
            ..Default::default()
        };
        assert_eq!(req.details(), "Method: bkash, TrxID: TX9FK2");

        req.kind = TransactionKind::DrivePack;
        req.form = RequestForm {
            number: Some("01863575188".to_string()),
            offer_title: Some("20 GB 100 Minute".to_string()),
            offer_price_in_cents: Some(35_000),
            ..Default::default()
        };
        assert_eq!(
            req.details(),
            "Target: 01863575188, Offer: 20 GB 100 Minute, Price: 350"
        );
    }

    #[test]
    fn amounts_render_in_major_units() {
        assert_eq!(format_amount(35_000), "350");
        assert_eq!(format_amount(12_550), "125.50");
        assert_eq!(format_amount(5), "0.05");
    }
}
