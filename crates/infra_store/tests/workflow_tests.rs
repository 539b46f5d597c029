//! End-to-end workflow tests over the in-memory adapters
//!
//! These exercise the services against the same conditional-update
//! contract the PostgreSQL adapters implement, including racing
//! transitions against a single aggregate.

use chrono::{Days, Utc};
use rust_decimal_macros::dec;
use std::sync::Arc;

use core_kernel::{Actor, Money};
use test_utils::ActorFixtures;
use domain_billing::{BillingError, BillingService, NewBill};
use domain_filing::{
    DecisionRuling, EmployeeStatus, FbrStatus, FilingError, FilingService, IncomeCategory,
    IncomeEntry, NewDraft, VerificationOutcome,
};
use domain_notify::NotifyService;
use domain_requests::{NewRequest, RequestService};
use domain_review::{ReviewEngine, ReviewError};
use infra_store::{
    MemoryBillStore, MemoryNotificationStore, MemoryRequestStore, MemoryReturnStore,
};

struct Portal {
    filing: FilingService,
    requests: RequestService,
    billing: BillingService,
    review: ReviewEngine,
    notify: Arc<NotifyService>,
}

fn portal() -> Portal {
    let returns = Arc::new(MemoryReturnStore::new());
    let request_store = Arc::new(MemoryRequestStore::new());
    let bills = Arc::new(MemoryBillStore::new());
    let notify = Arc::new(NotifyService::new(Arc::new(MemoryNotificationStore::new())));

    Portal {
        filing: FilingService::new(returns.clone(), notify.clone()),
        requests: RequestService::new(request_store, notify.clone()),
        billing: BillingService::new(bills, notify.clone()),
        review: ReviewEngine::new(returns, notify.clone()),
        notify,
    }
}

fn client() -> Actor {
    ActorFixtures::client()
}

fn employee() -> Actor {
    ActorFixtures::employee()
}

fn officer() -> Actor {
    ActorFixtures::officer()
}

fn salary_draft() -> NewDraft {
    NewDraft {
        tax_year: 2024,
        income_entries: vec![IncomeEntry::new(
            IncomeCategory::Salary,
            Money::rupees(dec!(2_500_000)),
        )],
    }
}

async fn submitted_return(portal: &Portal, client: &Actor) -> domain_filing::TaxReturn {
    let draft = portal
        .filing
        .create_draft(client, salary_draft())
        .await
        .unwrap();
    portal
        .filing
        .attach_document(client, draft.id, "salary_certificate.pdf".to_string())
        .await
        .unwrap();
    portal
        .filing
        .acknowledge_declaration(client, draft.id)
        .await
        .unwrap();
    portal.filing.submit(client, draft.id).await.unwrap()
}

mod filing_lifecycle {
    use super::*;

    #[tokio::test]
    async fn test_full_lifecycle_to_fbr_approval() {
        let portal = portal();
        let client = client();
        let employee = employee();
        let officer = officer();

        let submitted = submitted_return(&portal, &client).await;
        assert_eq!(submitted.employee_status, EmployeeStatus::Submitted);
        assert_eq!(submitted.fbr_status, Some(FbrStatus::Submitted));

        portal
            .filing
            .begin_review(&employee, submitted.id)
            .await
            .unwrap();
        portal
            .filing
            .record_assessment(
                &employee,
                submitted.id,
                Money::rupees(dec!(2_500_000)),
                Money::rupees(dec!(0)),
                dec!(5),
                Money::rupees(dec!(0)),
            )
            .await
            .unwrap();
        let verified = portal
            .filing
            .verify(&employee, submitted.id, VerificationOutcome::Approved)
            .await
            .unwrap();
        assert_eq!(verified.employee_status, EmployeeStatus::Approved);
        assert_eq!(verified.total_tax.unwrap().amount(), dec!(125_000));

        let queue = portal.review.queue(&officer).await.unwrap();
        assert_eq!(queue.len(), 1);

        portal.review.take_up(&officer, submitted.id).await.unwrap();
        let (decided, _) = portal
            .review
            .decide(&officer, submitted.id, DecisionRuling::Approved, None)
            .await
            .unwrap();
        assert_eq!(decided.fbr_status, Some(FbrStatus::Approved));
        assert!(portal.review.queue(&officer).await.unwrap().is_empty());

        // Client heard about the submission and the ruling.
        let feed = portal.notify.list_feed(&client, false).await.unwrap();
        let titles: Vec<&str> = feed.iter().map(|n| n.title.as_str()).collect();
        assert!(titles.contains(&"Return Submitted"));
        assert!(titles.contains(&"Return Approved"));
    }

    #[tokio::test]
    async fn test_submit_requires_document_and_declaration() {
        let portal = portal();
        let client = client();

        let draft = portal
            .filing
            .create_draft(&client, salary_draft())
            .await
            .unwrap();

        let result = portal.filing.submit(&client, draft.id).await;
        assert!(matches!(result, Err(FilingError::Validation(_))));
    }

    #[tokio::test]
    async fn test_client_cannot_touch_anothers_draft() {
        let portal = portal();
        let owner = client();
        let intruder = client();

        let draft = portal
            .filing
            .create_draft(&owner, salary_draft())
            .await
            .unwrap();

        let result = portal
            .filing
            .attach_document(&intruder, draft.id, "fake.pdf".to_string())
            .await;
        assert!(matches!(result, Err(FilingError::NotPermitted(_))));

        // Listing is scoped too.
        assert!(portal
            .filing
            .list_returns(&intruder, None)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_racing_submits_only_one_wins() {
        let portal = portal();
        let client = client();

        let draft = portal
            .filing
            .create_draft(&client, salary_draft())
            .await
            .unwrap();
        portal
            .filing
            .attach_document(&client, draft.id, "salary_certificate.pdf".to_string())
            .await
            .unwrap();
        portal
            .filing
            .acknowledge_declaration(&client, draft.id)
            .await
            .unwrap();

        let (a, b) = tokio::join!(
            portal.filing.submit(&client, draft.id),
            portal.filing.submit(&client, draft.id),
        );
        let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);
        let failure = if a.is_err() { a } else { b };
        assert!(failure.unwrap_err().is_state_error());
    }
}

mod review_race {
    use super::*;

    #[tokio::test]
    async fn test_racing_decisions_only_one_lands() {
        let portal = portal();
        let client = client();
        let employee = employee();
        let officer = officer();

        let submitted = submitted_return(&portal, &client).await;
        portal
            .filing
            .begin_review(&employee, submitted.id)
            .await
            .unwrap();

        let (a, b) = tokio::join!(
            portal
                .review
                .decide(&officer, submitted.id, DecisionRuling::Approved, None),
            portal
                .review
                .decide(&officer, submitted.id, DecisionRuling::Rejected, None),
        );
        let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
        assert_eq!(successes, 1);

        let failure = if a.is_err() {
            a.unwrap_err()
        } else {
            b.unwrap_err()
        };
        assert!(matches!(
            failure,
            ReviewError::NotEligible { .. } | ReviewError::AlreadyFinalized(_)
        ));

        // The stored ruling is whichever call won, and it is terminal.
        let stored = portal
            .filing
            .get_return(&officer, submitted.id)
            .await
            .unwrap();
        assert!(stored.fbr_status.unwrap().is_terminal());
    }
}

mod request_threads {
    use super::*;

    #[tokio::test]
    async fn test_thread_flow_with_counterpart_notices() {
        let portal = portal();
        let client = client();
        let employee = employee();

        let submitted = submitted_return(&portal, &client).await;

        let request = portal
            .requests
            .open_request(
                &employee,
                NewRequest {
                    return_id: submitted.id,
                    client_id: client.user_id.into(),
                    client_name: client.name.clone(),
                    subject: "Missing rental income details".to_string(),
                    message: "Please provide the tenancy agreement.".to_string(),
                },
            )
            .await
            .unwrap();

        portal
            .requests
            .reply(&client, request.id, "Uploaded the agreement.".to_string(), vec![])
            .await
            .unwrap();

        // The opening employee hears about the client's reply.
        let employee_feed = portal.notify.list_feed(&employee, false).await.unwrap();
        assert!(employee_feed
            .iter()
            .any(|n| n.title == "Info Request Reply"));

        portal.requests.resolve(&employee, request.id).await.unwrap();
        let result = portal
            .requests
            .reply(&client, request.id, "One more thing".to_string(), vec![])
            .await;
        assert!(result.unwrap_err().is_state_error());
    }
}

mod bill_settlement {
    use super::*;

    #[tokio::test]
    async fn test_racing_payments_only_one_settles() {
        let portal = portal();
        let client = client();
        let employee = employee();

        let bill = portal
            .billing
            .generate_bill(
                &employee,
                NewBill {
                    client_id: client.user_id.into(),
                    description: "Tax Filing Services - FY 2024".to_string(),
                    amount: Money::rupees(dec!(35_000)),
                    due_date: Utc::now().date_naive() + Days::new(30),
                    items: vec![],
                },
            )
            .await
            .unwrap();

        let (a, b) = tokio::join!(
            portal.billing.pay_bill(&client, bill.id),
            portal.billing.pay_bill(&client, bill.id),
        );
        let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);
        let failure = if a.is_err() { a } else { b };
        assert!(matches!(failure, Err(BillingError::AlreadySettled(_))));
    }

    #[tokio::test]
    async fn test_pay_then_cancel_conflicts() {
        let portal = portal();
        let client = client();
        let employee = employee();

        let bill = portal
            .billing
            .generate_bill(
                &employee,
                NewBill {
                    client_id: client.user_id.into(),
                    description: "Consultation".to_string(),
                    amount: Money::rupees(dec!(5_000)),
                    due_date: Utc::now().date_naive() + Days::new(7),
                    items: vec![],
                },
            )
            .await
            .unwrap();

        portal.billing.pay_bill(&client, bill.id).await.unwrap();
        let result = portal.billing.cancel_bill(&employee, bill.id).await;
        assert!(matches!(result, Err(BillingError::AlreadySettled(_))));

        // The client was told about the bill when it was generated.
        let feed = portal.notify.list_feed(&client, false).await.unwrap();
        assert!(feed.iter().any(|n| n.title == "Payment Due"));
    }
}
