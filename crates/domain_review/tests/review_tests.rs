//! Tests for domain_review

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use core_kernel::{
    Actor, ClientId, Money, NoticeKind, NotificationSink, PortError, ReturnId, UserId,
};
use domain_filing::{
    DecisionRuling, DocumentRef, EmployeeStatus, FbrStatus, IncomeEntry, ReturnFilter,
    ReturnRepository, TaxAssessment, TaxReturn, VerificationOutcome,
};
use domain_review::{ReviewContext, ReviewEngine, ReviewError};
use test_utils::{assert_decision_eligible, assert_finalized, ActorFixtures, TestReturnBuilder};

#[derive(Default)]
struct StubReturnRepo {
    returns: RwLock<HashMap<ReturnId, TaxReturn>>,
}

impl StubReturnRepo {
    async fn seed(&self, tax_return: TaxReturn) {
        self.returns
            .write()
            .await
            .insert(tax_return.id, tax_return);
    }

    async fn mutate<F>(&self, id: ReturnId, f: F) -> Result<TaxReturn, PortError>
    where
        F: FnOnce(&mut TaxReturn) -> Result<(), domain_filing::FilingError>,
    {
        let mut returns = self.returns.write().await;
        let tax_return = returns
            .get_mut(&id)
            .ok_or_else(|| PortError::not_found("TaxReturn", id.to_string()))?;
        f(tax_return).map_err(|err| PortError::conflict(err.to_string()))?;
        Ok(tax_return.clone())
    }
}

#[async_trait]
impl ReturnRepository for StubReturnRepo {
    async fn insert(&self, tax_return: &TaxReturn) -> Result<(), PortError> {
        self.seed(tax_return.clone()).await;
        Ok(())
    }

    async fn fetch(&self, id: ReturnId) -> Result<TaxReturn, PortError> {
        self.returns
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("TaxReturn", id.to_string()))
    }

    async fn list(&self, filter: &ReturnFilter) -> Result<Vec<TaxReturn>, PortError> {
        let returns = self.returns.read().await;
        Ok(returns
            .values()
            .filter(|r| filter.client_id.map_or(true, |c| r.client_id == c))
            .filter(|r| !filter.decision_eligible || r.is_decision_eligible())
            .cloned()
            .collect())
    }

    async fn attach_document(
        &self,
        id: ReturnId,
        document: DocumentRef,
    ) -> Result<TaxReturn, PortError> {
        self.mutate(id, |r| r.attach_document(document)).await
    }

    async fn update_income(
        &self,
        id: ReturnId,
        income_entries: Vec<IncomeEntry>,
    ) -> Result<TaxReturn, PortError> {
        self.mutate(id, |r| r.update_income(income_entries)).await
    }

    async fn acknowledge_declaration(&self, id: ReturnId) -> Result<TaxReturn, PortError> {
        self.mutate(id, |r| r.acknowledge_declaration()).await
    }

    async fn submit(
        &self,
        id: ReturnId,
        now: chrono::DateTime<Utc>,
    ) -> Result<TaxReturn, PortError> {
        self.mutate(id, |r| r.submit(now)).await
    }

    async fn begin_review(&self, id: ReturnId) -> Result<TaxReturn, PortError> {
        self.mutate(id, |r| r.begin_review()).await
    }

    async fn verify(
        &self,
        id: ReturnId,
        outcome: VerificationOutcome,
    ) -> Result<TaxReturn, PortError> {
        self.mutate(id, |r| r.verify(outcome)).await
    }

    async fn save_assessment(
        &self,
        id: ReturnId,
        assessment: &TaxAssessment,
    ) -> Result<TaxReturn, PortError> {
        let assessment = assessment.clone();
        self.mutate(id, |r| r.record_assessment(assessment)).await
    }

    async fn take_up(&self, id: ReturnId) -> Result<TaxReturn, PortError> {
        self.mutate(id, |r| r.take_up_review()).await
    }

    async fn decide(&self, id: ReturnId, ruling: DecisionRuling) -> Result<TaxReturn, PortError> {
        self.mutate(id, |r| r.apply_decision(ruling)).await
    }
}

#[derive(Default)]
struct RecordingSink {
    pushed: RwLock<Vec<(UserId, String, NoticeKind)>>,
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn push(
        &self,
        recipient: UserId,
        title: &str,
        _message: &str,
        kind: NoticeKind,
    ) -> Result<(), PortError> {
        self.pushed
            .write()
            .await
            .push((recipient, title.to_string(), kind));
        Ok(())
    }
}

fn officer() -> Actor {
    ActorFixtures::officer()
}

fn client_actor() -> Actor {
    ActorFixtures::client()
}

fn forwarded_return(client_id: ClientId) -> TaxReturn {
    TestReturnBuilder::new()
        .with_client_id(client_id)
        .build_in_review()
}

async fn setup() -> (ReviewEngine, Arc<StubReturnRepo>, Arc<RecordingSink>) {
    let repo = Arc::new(StubReturnRepo::default());
    let sink = Arc::new(RecordingSink::default());
    let engine = ReviewEngine::new(repo.clone(), sink.clone());
    (engine, repo, sink)
}

mod queue {
    use super::*;

    #[tokio::test]
    async fn test_queue_lists_only_eligible_returns() {
        let (engine, repo, _) = setup().await;

        let eligible = forwarded_return(ClientId::new());
        let eligible_id = eligible.id;
        repo.seed(eligible).await;

        let draft = TestReturnBuilder::new()
            .with_client_name("Sara Khan")
            .build_draft();
        repo.seed(draft).await;

        let queue = engine.queue(&officer()).await.unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].id, eligible_id);
    }

    #[tokio::test]
    async fn test_queue_drops_decided_returns() {
        let (engine, repo, _) = setup().await;
        let tax_return = forwarded_return(ClientId::new());
        let id = tax_return.id;
        repo.seed(tax_return).await;

        engine
            .decide(&officer(), id, DecisionRuling::Approved, None)
            .await
            .unwrap();

        assert!(engine.queue(&officer()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_queue_requires_officer_role() {
        let (engine, _, _) = setup().await;
        let result = engine.queue(&client_actor()).await;
        assert!(matches!(result, Err(ReviewError::NotPermitted(_))));
    }
}

mod take_up {
    use super::*;

    #[tokio::test]
    async fn test_take_up_moves_to_under_review() {
        let (engine, repo, _) = setup().await;
        let tax_return = forwarded_return(ClientId::new());
        let id = tax_return.id;
        repo.seed(tax_return).await;

        let updated = engine.take_up(&officer(), id).await.unwrap();
        assert_eq!(updated.fbr_status, Some(FbrStatus::UnderReview));
        // Still in the queue until a ruling lands.
        assert_decision_eligible(&updated);
    }

    #[tokio::test]
    async fn test_take_up_rejects_unforwarded_return() {
        let (engine, repo, _) = setup().await;
        let mut tax_return = forwarded_return(ClientId::new());
        let id = tax_return.id;
        // Firm has not reached in_review yet.
        tax_return.employee_status = EmployeeStatus::Submitted;
        repo.seed(tax_return).await;

        let result = engine.take_up(&officer(), id).await;
        assert!(matches!(result, Err(ReviewError::NotEligible { .. })));
    }
}

mod decisions {
    use super::*;

    #[tokio::test]
    async fn test_decide_finalizes_and_notifies_client() {
        let (engine, repo, sink) = setup().await;
        let client_id = ClientId::new();
        let tax_return = forwarded_return(client_id);
        let id = tax_return.id;
        repo.seed(tax_return).await;

        let (updated, decision) = engine
            .decide(&officer(), id, DecisionRuling::Approved, Some("Clean filing".into()))
            .await
            .unwrap();

        assert_eq!(updated.fbr_status, Some(FbrStatus::Approved));
        assert_finalized(&updated);
        assert_eq!(decision.ruling, DecisionRuling::Approved);
        assert_eq!(decision.notes.as_deref(), Some("Clean filing"));

        let pushed = sink.pushed.read().await;
        assert_eq!(pushed.len(), 1);
        assert_eq!(pushed[0].0, UserId::from(client_id));
        assert_eq!(pushed[0].1, "Return Approved");
        assert_eq!(pushed[0].2, NoticeKind::Success);
    }

    #[tokio::test]
    async fn test_objection_is_terminal() {
        let (engine, repo, _) = setup().await;
        let tax_return = forwarded_return(ClientId::new());
        let id = tax_return.id;
        repo.seed(tax_return).await;

        engine
            .decide(&officer(), id, DecisionRuling::Objection, None)
            .await
            .unwrap();

        let result = engine
            .decide(&officer(), id, DecisionRuling::Approved, None)
            .await;
        assert!(matches!(result, Err(ReviewError::NotEligible { .. })));
    }

    #[tokio::test]
    async fn test_decide_requires_officer_role() {
        let (engine, repo, _) = setup().await;
        let tax_return = forwarded_return(ClientId::new());
        let id = tax_return.id;
        repo.seed(tax_return).await;

        let result = engine
            .decide(&client_actor(), id, DecisionRuling::Approved, None)
            .await;
        assert!(matches!(result, Err(ReviewError::NotPermitted(_))));
    }

    #[tokio::test]
    async fn test_decide_missing_return() {
        let (engine, _, _) = setup().await;
        let result = engine
            .decide(&officer(), ReturnId::new(), DecisionRuling::Approved, None)
            .await;
        assert!(matches!(result, Err(ReviewError::ReturnNotFound(_))));
    }
}

mod context {
    use super::*;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_context_assembles_breakdown_and_documents() {
        let (engine, repo, _) = setup().await;
        let mut tax_return = forwarded_return(ClientId::new());
        let assessment = TaxAssessment::compute(
            tax_return.total_income,
            Money::rupees(Decimal::ZERO),
            core_kernel::Rate::from_percentage(dec!(10)),
            Money::rupees(Decimal::ZERO),
        )
        .unwrap();
        tax_return.record_assessment(assessment).unwrap();
        let id = tax_return.id;
        repo.seed(tax_return).await;

        let context: ReviewContext = engine.review_context(&officer(), id).await.unwrap();
        assert_eq!(context.return_id, id);
        assert_eq!(context.income_breakdown.len(), 1);
        assert_eq!(context.documents.len(), 1);
        assert!(context.declaration_acknowledged);
        assert!(context.assessment.is_some());
    }

    #[tokio::test]
    async fn test_context_denied_to_clients() {
        let (engine, repo, _) = setup().await;
        let tax_return = forwarded_return(ClientId::new());
        let id = tax_return.id;
        repo.seed(tax_return).await;

        let result = engine.review_context(&client_actor(), id).await;
        assert!(matches!(result, Err(ReviewError::NotPermitted(_))));
    }
}
