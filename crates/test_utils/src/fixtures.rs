//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for common entities across the tax
//! filing portal. These fixtures are designed to be consistent and
//! predictable for unit tests.

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use rust_decimal_macros::dec;
use uuid::Uuid;

use core_kernel::{
    Actor, BillId, ClientId, Currency, Money, Rate, RequestId, ReturnId, Role, UserId,
};

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// Standard declared salary income
    pub fn salary_income() -> Money {
        Money::rupees(dec!(2_500_000))
    }

    /// Standard annual filing fee
    pub fn filing_fee() -> Money {
        Money::rupees(dec!(35_000))
    }

    /// Standard consultation fee
    pub fn consultation_fee() -> Money {
        Money::rupees(dec!(5_000))
    }

    /// Zero rupees
    pub fn zero() -> Money {
        Money::zero(Currency::PKR)
    }

    /// A USD amount for currency mismatch tests
    pub fn usd_100() -> Money {
        Money::new(dec!(100.00), Currency::USD)
    }
}

/// Fixture for rate test data
pub struct RateFixtures;

impl RateFixtures {
    /// Standard manually entered tax rate (5%)
    pub fn standard_rate() -> Rate {
        Rate::from_percentage(dec!(5))
    }

    /// Elevated rate for higher brackets (10%)
    pub fn elevated_rate() -> Rate {
        Rate::from_percentage(dec!(10))
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Tax year the standard fixtures file for
    pub fn tax_year() -> u16 {
        2024
    }

    /// Standard submission timestamp
    pub fn submission_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 9, 30, 0).unwrap()
    }

    /// A due date comfortably in the future
    pub fn due_in_30_days() -> NaiveDate {
        Utc::now().date_naive() + Days::new(30)
    }

    /// A due date already in the past, for overdue checks
    pub fn past_due_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
    }
}

/// Fixture for identifier test data
pub struct IdFixtures;

impl IdFixtures {
    /// Creates a deterministic return ID for testing
    pub fn return_id() -> ReturnId {
        ReturnId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440001").unwrap())
    }

    /// Creates a deterministic client ID for testing
    pub fn client_id() -> ClientId {
        ClientId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440002").unwrap())
    }

    /// Creates a deterministic bill ID for testing
    pub fn bill_id() -> BillId {
        BillId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440003").unwrap())
    }

    /// Creates a deterministic request ID for testing
    pub fn request_id() -> RequestId {
        RequestId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440004").unwrap())
    }

    /// Creates a deterministic user ID for testing
    pub fn user_id() -> UserId {
        UserId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440005").unwrap())
    }
}

/// Fixture for string test data
pub struct StringFixtures;

impl StringFixtures {
    /// Test client display name
    pub fn client_name() -> &'static str {
        "Ahmed Hassan"
    }

    /// Test employee display name
    pub fn employee_name() -> &'static str {
        "Sara Khan"
    }

    /// Test officer display name
    pub fn officer_name() -> &'static str {
        "Officer Malik"
    }

    /// Standard uploaded document name
    pub fn document_name() -> &'static str {
        "salary_certificate.pdf"
    }

    /// Standard bill description
    pub fn bill_description() -> &'static str {
        "Tax Filing Services - FY 2024"
    }

    /// Standard info request subject
    pub fn request_subject() -> &'static str {
        "Missing rental income details"
    }
}

/// Fixture for caller identities
pub struct ActorFixtures;

impl ActorFixtures {
    /// A client actor with a fresh user id
    pub fn client() -> Actor {
        Actor::new(UserId::new(), StringFixtures::client_name(), Role::Client)
    }

    /// An employee actor with a fresh user id
    pub fn employee() -> Actor {
        Actor::new(UserId::new(), StringFixtures::employee_name(), Role::Employee)
    }

    /// An FBR officer actor with a fresh user id
    pub fn officer() -> Actor {
        Actor::new(UserId::new(), StringFixtures::officer_name(), Role::FbrOfficer)
    }

    /// A client actor bound to an existing client id
    pub fn client_for(client_id: ClientId) -> Actor {
        Actor::new(client_id.into(), StringFixtures::client_name(), Role::Client)
    }
}
