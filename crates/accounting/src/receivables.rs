//! Accounts receivable: debtor list, exposure and the payment flow.
//!
//! After a payment the debtor list is always re-fetched from the ledger; the
//! new balance is whatever the backend reports.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use papeleria_core::{ClientId, Money};
use papeleria_parties::Client;

/// Active clients whose debt is above the paid-off epsilon, in arrival order.
pub fn list_debtors(clients: Vec<Client>) -> Vec<Client> {
    clients.into_iter().filter(Client::is_debtor).collect()
}

/// Σ current debt. Order independent.
pub fn total_exposure(debtors: &[Client]) -> Money {
    debtors.iter().map(Client::current_debt).sum()
}

/// Debtors plus the exposure over the whole (unsearched) set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DebtorSnapshot {
    pub debtors: Vec<Client>,
    pub total_exposure: Money,
    pub count: usize,
}

impl DebtorSnapshot {
    pub fn from_clients(clients: Vec<Client>) -> Self {
        let debtors = list_debtors(clients);
        Self {
            total_exposure: total_exposure(&debtors),
            count: debtors.len(),
            debtors,
        }
    }

    /// Cosmetic filter over the fetched list; exposure and count keep describing the full set.
    pub fn searched(mut self, needle: &str) -> Self {
        self.debtors.retain(|c| c.matches(needle));
        self
    }

    pub fn find(&self, id: ClientId) -> Option<&Client> {
        self.debtors.iter().find(|c| c.id == id)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PaymentRejection {
    #[error("El monto debe ser mayor a 0")]
    NonPositiveAmount,
}

/// Local checks before any network call.
///
/// Returns `Ok(None)` when no client is selected (nothing to submit).
pub fn validate_payment(
    client: Option<ClientId>,
    amount: Decimal,
) -> Result<Option<(ClientId, Money)>, PaymentRejection> {
    let Some(client) = client else {
        return Ok(None);
    };
    if amount <= Decimal::ZERO {
        return Err(PaymentRejection::NonPositiveAmount);
    }
    Ok(Some((client, Money::new(amount))))
}

/// Backend-owned source of client credit balances.
#[async_trait::async_trait]
pub trait CreditLedger: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn fetch_clients(&self) -> Result<Vec<Client>, Self::Error>;

    /// Apply `amount` against the client's current debt.
    async fn apply_payment(&self, client: ClientId, amount: Money) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerState {
    Loading,
    Idle,
    PaymentInFlight,
}

#[derive(Debug, Error)]
pub enum ReceivablesError<E: std::error::Error + 'static> {
    #[error(transparent)]
    Rejected(#[from] PaymentRejection),

    #[error(transparent)]
    Ledger(E),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// No client selected; nothing was sent.
    Skipped,
    /// Payment accepted; snapshot re-fetched afterwards.
    Applied,
}

/// The receivables screen: `Loading -> Idle -> PaymentInFlight -> Idle`.
#[derive(Debug)]
pub struct ReceivablesView<L> {
    ledger: L,
    state: LedgerState,
    snapshot: DebtorSnapshot,
}

impl<L: CreditLedger> ReceivablesView<L> {
    pub fn new(ledger: L) -> Self {
        Self {
            ledger,
            state: LedgerState::Loading,
            snapshot: DebtorSnapshot::default(),
        }
    }

    pub fn state(&self) -> LedgerState {
        self.state
    }

    pub fn snapshot(&self) -> &DebtorSnapshot {
        &self.snapshot
    }

    pub fn into_snapshot(self) -> DebtorSnapshot {
        self.snapshot
    }

    /// Fetch the full client list and rebuild the debtor snapshot.
    pub async fn load(&mut self) -> Result<&DebtorSnapshot, L::Error> {
        self.state = LedgerState::Loading;
        let fetched = self.ledger.fetch_clients().await;
        self.state = LedgerState::Idle;
        self.snapshot = DebtorSnapshot::from_clients(fetched?);
        Ok(&self.snapshot)
    }

    /// Submit a payment, then re-fetch. A failed submission leaves the
    /// current snapshot untouched.
    pub async fn record_payment(
        &mut self,
        client: Option<ClientId>,
        amount: Decimal,
    ) -> Result<PaymentOutcome, ReceivablesError<L::Error>> {
        let Some((client, amount)) = validate_payment(client, amount)? else {
            return Ok(PaymentOutcome::Skipped);
        };

        self.state = LedgerState::PaymentInFlight;
        let applied = self.ledger.apply_payment(client, amount).await;
        if let Err(err) = applied {
            self.state = LedgerState::Idle;
            tracing::warn!(client = %client, error = %err, "payment rejected");
            return Err(ReceivablesError::Ledger(err));
        }
        tracing::info!(client = %client, amount = %amount.amount(), "payment applied");

        self.load().await.map_err(ReceivablesError::Ledger)?;
        Ok(PaymentOutcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use papeleria_parties::{ContactInfo, CreditProfile};
    use proptest::prelude::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn client(id: i64, name: &str, debt: Decimal, active: bool) -> Client {
        Client {
            id: ClientId::new(id),
            name: name.to_string(),
            tax_id: Some(format!("V-{id:08}")),
            contact: ContactInfo::default(),
            credit_profile: Some(CreditProfile {
                credit_limit: Money::from(1000),
                current_debt: Money::new(debt),
                is_active: active,
            }),
        }
    }

    #[derive(Debug, Error)]
    #[error("{0}")]
    struct FakeError(String);

    /// In-memory ledger that counts calls. `settle` controls what balance the
    /// backend reports after a payment.
    struct FakeLedger {
        clients: Mutex<Vec<Client>>,
        fetches: AtomicUsize,
        payments: AtomicUsize,
        reject_with: Option<String>,
        settle: fn(Decimal, Decimal) -> Decimal,
    }

    impl FakeLedger {
        fn new(clients: Vec<Client>) -> Self {
            Self {
                clients: Mutex::new(clients),
                fetches: AtomicUsize::new(0),
                payments: AtomicUsize::new(0),
                reject_with: None,
                settle: |debt, paid| debt - paid,
            }
        }
    }

    #[async_trait::async_trait]
    impl<'a> CreditLedger for &'a FakeLedger {
        type Error = FakeError;

        async fn fetch_clients(&self) -> Result<Vec<Client>, FakeError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.clients.lock().unwrap().clone())
        }

        async fn apply_payment(&self, id: ClientId, amount: Money) -> Result<(), FakeError> {
            self.payments.fetch_add(1, Ordering::SeqCst);
            if let Some(msg) = &self.reject_with {
                return Err(FakeError(msg.clone()));
            }
            let mut clients = self.clients.lock().unwrap();
            let c = clients.iter_mut().find(|c| c.id == id).unwrap();
            let profile = c.credit_profile.as_mut().unwrap();
            profile.current_debt = Money::new((self.settle)(profile.current_debt.amount(), amount.amount()));
            Ok(())
        }
    }

    #[test]
    fn debtor_filter_and_exposure() {
        let snapshot = DebtorSnapshot::from_clients(vec![
            client(1, "Ana", Decimal::new(150, 0), true),
            client(2, "Beto", Decimal::new(5, 3), true),
            client(3, "Carla", Decimal::new(80, 0), false),
            client(4, "Dario", Decimal::new(2050, 2), true),
        ]);
        let ids: Vec<i64> = snapshot.debtors.iter().map(|c| c.id.get()).collect();
        assert_eq!(ids, vec![1, 4]);
        assert_eq!(snapshot.total_exposure, Money::new(Decimal::new(17050, 2)));
        assert_eq!(snapshot.count, 2);
    }

    #[test]
    fn search_keeps_full_exposure() {
        let snapshot = DebtorSnapshot::from_clients(vec![
            client(1, "Ana", Decimal::new(150, 0), true),
            client(2, "Beto", Decimal::new(50, 0), true),
        ])
        .searched("beto");
        assert_eq!(snapshot.debtors.len(), 1);
        assert_eq!(snapshot.total_exposure, Money::from(200));
        assert_eq!(snapshot.count, 2);
    }

    #[test]
    fn payment_validation() {
        assert_eq!(validate_payment(None, Decimal::TEN), Ok(None));
        assert_eq!(
            validate_payment(Some(ClientId::new(1)), Decimal::ZERO),
            Err(PaymentRejection::NonPositiveAmount)
        );
        assert_eq!(
            validate_payment(Some(ClientId::new(1)), Decimal::NEGATIVE_ONE),
            Err(PaymentRejection::NonPositiveAmount)
        );
        assert!(validate_payment(Some(ClientId::new(1)), Decimal::ONE).unwrap().is_some());
    }

    #[tokio::test]
    async fn partial_payment_refetches_backend_balance() {
        let ledger = FakeLedger::new(vec![client(1, "Ana", Decimal::new(150, 0), true)]);
        let mut view = ReceivablesView::new(&ledger);
        assert_eq!(view.state(), LedgerState::Loading);
        view.load().await.unwrap();
        assert_eq!(view.state(), LedgerState::Idle);

        let outcome = view.record_payment(Some(ClientId::new(1)), Decimal::new(50, 0)).await.unwrap();
        assert_eq!(outcome, PaymentOutcome::Applied);
        assert_eq!(view.state(), LedgerState::Idle);
        assert_eq!(ledger.fetches.load(Ordering::SeqCst), 2);
        let ana = view.snapshot().find(ClientId::new(1)).unwrap();
        assert_eq!(ana.current_debt(), Money::from(100));
    }

    #[tokio::test]
    async fn displayed_balance_comes_from_backend_not_local_math() {
        let mut ledger = FakeLedger::new(vec![client(1, "Ana", Decimal::new(150, 0), true)]);
        // Backend applies a surcharge; the view must show it as reported.
        ledger.settle = |debt, paid| debt - paid + Decimal::new(7, 0);
        let mut view = ReceivablesView::new(&ledger);
        view.record_payment(Some(ClientId::new(1)), Decimal::new(50, 0)).await.unwrap();
        assert_eq!(view.snapshot().total_exposure, Money::from(107));
    }

    #[tokio::test]
    async fn full_payment_drops_the_debtor() {
        let ledger = FakeLedger::new(vec![client(1, "Ana", Decimal::new(150, 0), true)]);
        let mut view = ReceivablesView::new(&ledger);
        view.load().await.unwrap();
        view.record_payment(Some(ClientId::new(1)), Decimal::new(150, 0)).await.unwrap();
        assert!(view.snapshot().debtors.is_empty());
        assert_eq!(view.snapshot().total_exposure, Money::ZERO);
    }

    #[tokio::test]
    async fn invalid_payments_make_no_calls() {
        let ledger = FakeLedger::new(vec![client(1, "Ana", Decimal::new(150, 0), true)]);
        let mut view = ReceivablesView::new(&ledger);

        let skipped = view.record_payment(None, Decimal::new(50, 0)).await.unwrap();
        assert_eq!(skipped, PaymentOutcome::Skipped);
        let rejected = view.record_payment(Some(ClientId::new(1)), Decimal::ZERO).await;
        assert!(matches!(rejected, Err(ReceivablesError::Rejected(_))));

        assert_eq!(ledger.payments.load(Ordering::SeqCst), 0);
        assert_eq!(ledger.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn backend_rejection_keeps_snapshot_and_message() {
        let mut ledger = FakeLedger::new(vec![client(1, "Ana", Decimal::new(150, 0), true)]);
        ledger.reject_with = Some("El abono excede la deuda".to_string());
        let mut view = ReceivablesView::new(&ledger);
        view.load().await.unwrap();

        let err = view.record_payment(Some(ClientId::new(1)), Decimal::new(500, 0)).await.unwrap_err();
        assert_eq!(err.to_string(), "El abono excede la deuda");
        assert_eq!(view.state(), LedgerState::Idle);
        assert_eq!(view.snapshot().count, 1);
        assert_eq!(ledger.fetches.load(Ordering::SeqCst), 1);
    }

    proptest! {
        #[test]
        fn exposure_is_sum_over_qualifying_clients(
            rows in prop::collection::vec((0i64..100_000, any::<bool>()), 0..50)
        ) {
            let clients: Vec<Client> = rows
                .iter()
                .enumerate()
                .map(|(i, (cents, active))| client(i as i64, "c", Decimal::new(*cents, 2), *active))
                .collect();
            let snapshot = DebtorSnapshot::from_clients(clients);

            let epsilon = Decimal::new(1, 2);
            let expected: Decimal = rows
                .iter()
                .filter(|(cents, active)| *active && Decimal::new(*cents, 2) > epsilon)
                .map(|(cents, _)| Decimal::new(*cents, 2))
                .sum();
            prop_assert_eq!(snapshot.total_exposure, Money::new(expected));
            for d in &snapshot.debtors {
                let profile = d.credit_profile.as_ref().unwrap();
                prop_assert!(profile.is_active);
                prop_assert!(profile.current_debt.amount() > epsilon);
            }

            let mut reversed = snapshot.debtors.clone();
            reversed.reverse();
            prop_assert_eq!(total_exposure(&reversed), snapshot.total_exposure);
        }
    }
}
