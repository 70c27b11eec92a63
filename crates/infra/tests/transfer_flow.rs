//! Black-box tests: the full transfer flow against the in-memory store.

use std::sync::Arc;
use std::thread;

use proptest::prelude::*;

use ledgerkit_core::{
    AggregateRoot, CurrencyCode, LedgerError, OrganizationId, UserId, WalletId,
};
use ledgerkit_infra::InMemoryWalletStore;
use ledgerkit_transfer::TransferService;
use ledgerkit_wallet::{Currency, Wallet, WalletStatus};

struct TestLedger {
    store: Arc<InMemoryWalletStore>,
    service: TransferService,
    org: OrganizationId,
}

impl TestLedger {
    fn new() -> Self {
        ledgerkit_observability::init();
        let store = Arc::new(InMemoryWalletStore::new());
        let service = TransferService::new(store.clone());
        Self {
            store,
            service,
            org: OrganizationId::new(),
        }
    }

    /// Seed an active wallet holding `amount` minor units of USD.
    fn wallet_with_usd(&self, amount: i64) -> WalletId {
        self.wallet_with_usd_in(self.org, amount)
    }

    fn wallet_with_usd_in(&self, org: OrganizationId, amount: i64) -> WalletId {
        let mut wallet = Wallet::open(WalletId::new(), UserId::new(), org);
        if amount > 0 {
            wallet.add_balance(&usd(), amount).unwrap();
        }
        let id = *wallet.id();
        self.store.seed(wallet).unwrap();
        id
    }

    fn usd_amount(&self, id: WalletId) -> i64 {
        self.store.snapshot(id).unwrap().unwrap().amount_of(&usd())
    }
}

fn usd() -> CurrencyCode {
    CurrencyCode::new("USD")
}

fn usd_currency() -> Currency {
    Currency::new("USD", "US Dollar", 2)
}

#[test]
fn transfer_moves_funds_between_wallets() {
    let ledger = TestLedger::new();
    let a = ledger.wallet_with_usd(usd_currency().parse_amount("100.00").unwrap());
    let b = ledger.wallet_with_usd(usd_currency().parse_amount("10.00").unwrap());

    let amount = usd_currency().parse_amount("30.00").unwrap();
    let result = ledger.service.transfer(a, b, amount, &usd()).unwrap();

    assert_eq!(result.from_wallet_id, a);
    assert_eq!(result.to_wallet_id, b);
    assert_eq!(result.currency, usd());
    assert_eq!(result.amount, 3_000);
    assert_eq!(ledger.usd_amount(a), 7_000);
    assert_eq!(ledger.usd_amount(b), 4_000);
}

#[test]
fn insufficient_funds_leaves_both_wallets_untouched() {
    let ledger = TestLedger::new();
    let a = ledger.wallet_with_usd(10_000);
    let b = ledger.wallet_with_usd(1_000);
    let a_before = ledger.store.snapshot(a).unwrap().unwrap();
    let b_before = ledger.store.snapshot(b).unwrap().unwrap();

    let err = ledger.service.transfer(a, b, 15_000, &usd()).unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientFunds { .. }));

    assert_eq!(ledger.store.snapshot(a).unwrap().unwrap(), a_before);
    assert_eq!(ledger.store.snapshot(b).unwrap().unwrap(), b_before);
}

#[test]
fn cross_organization_transfer_is_rejected() {
    let ledger = TestLedger::new();
    let a = ledger.wallet_with_usd(10_000);
    let other_org = OrganizationId::new();
    let c = ledger.wallet_with_usd_in(other_org, 1_000);

    let err = ledger.service.transfer(a, c, 3_000, &usd()).unwrap_err();
    assert!(matches!(err, LedgerError::CrossOrganizationTransfer { .. }));
    assert_eq!(ledger.usd_amount(a), 10_000);
    assert_eq!(ledger.usd_amount(c), 1_000);
}

#[test]
fn frozen_wallet_blocks_transfers_both_ways() {
    let ledger = TestLedger::new();
    let a = ledger.wallet_with_usd(10_000);
    let b = ledger.wallet_with_usd(1_000);

    let mut frozen = ledger.store.snapshot(a).unwrap().unwrap();
    frozen.freeze().unwrap();
    assert_eq!(frozen.status(), WalletStatus::Frozen);
    ledger.store.seed(frozen).unwrap();

    let err = ledger.service.transfer(a, b, 1_000, &usd()).unwrap_err();
    assert!(matches!(err, LedgerError::WalletNotActive { .. }));
    // As destination too.
    let err = ledger.service.transfer(b, a, 100, &usd()).unwrap_err();
    assert!(matches!(err, LedgerError::WalletNotActive { .. }));

    assert_eq!(ledger.usd_amount(a), 10_000);
    assert_eq!(ledger.usd_amount(b), 1_000);
}

#[test]
fn closed_wallet_blocks_transfers() {
    let ledger = TestLedger::new();
    let a = ledger.wallet_with_usd(10_000);
    let b = ledger.wallet_with_usd(1_000);

    let mut closed = ledger.store.snapshot(b).unwrap().unwrap();
    closed.close().unwrap();
    ledger.store.seed(closed).unwrap();

    let err = ledger.service.transfer(a, b, 1_000, &usd()).unwrap_err();
    assert!(matches!(err, LedgerError::WalletNotActive { .. }));
    assert_eq!(ledger.usd_amount(a), 10_000);
}

#[test]
fn unknown_wallet_is_reported_as_not_found() {
    let ledger = TestLedger::new();
    let a = ledger.wallet_with_usd(10_000);
    let ghost = WalletId::new();

    let err = ledger.service.transfer(a, ghost, 1_000, &usd()).unwrap_err();
    assert_eq!(err, LedgerError::WalletNotFound(ghost));

    let err = ledger.service.transfer(ghost, a, 1_000, &usd()).unwrap_err();
    assert_eq!(err, LedgerError::WalletNotFound(ghost));
}

#[test]
fn unknown_currency_on_the_source_is_rejected() {
    let ledger = TestLedger::new();
    let a = ledger.wallet_with_usd(10_000);
    let b = ledger.wallet_with_usd(1_000);

    let eur = CurrencyCode::new("EUR");
    let err = ledger.service.transfer(a, b, 500, &eur).unwrap_err();
    assert_eq!(err, LedgerError::UnknownCurrency(eur));
}

#[test]
fn destination_balance_is_auto_created_at_zero() {
    let ledger = TestLedger::new();
    let a = ledger.wallet_with_usd(10_000);
    // Destination has never held USD.
    let b = ledger.wallet_with_usd(0);
    assert!(ledger.store.snapshot(b).unwrap().unwrap().balance(&usd()).is_none());

    ledger.service.transfer(a, b, 2_500, &usd()).unwrap();
    assert_eq!(ledger.usd_amount(b), 2_500);
}

#[test]
fn non_positive_amounts_fail_without_loading_wallets() {
    let ledger = TestLedger::new();
    let a = ledger.wallet_with_usd(10_000);
    let b = ledger.wallet_with_usd(1_000);

    for amount in [0, -3_000] {
        let err = ledger.service.transfer(a, b, amount, &usd()).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));
    }
    let err = ledger.service.transfer(a, a, 1_000, &usd()).unwrap_err();
    assert_eq!(err, LedgerError::SelfTransfer(a));
}

#[test]
fn transfer_references_are_issued_in_order() {
    let ledger = TestLedger::new();
    let a = ledger.wallet_with_usd(10_000);
    let b = ledger.wallet_with_usd(0);

    let first = ledger.service.transfer(a, b, 100, &usd()).unwrap();
    let second = ledger.service.transfer(a, b, 100, &usd()).unwrap();
    // UUIDv7 references sort by issue time.
    assert!(second.reference.as_uuid() > first.reference.as_uuid());
}

/// Two transfers of 60.00 from a 100.00 wallet racing each other: exactly
/// one commits, the loser re-reads and fails on funds, and the source never
/// goes negative.
#[test]
fn concurrent_transfers_from_one_wallet_serialize() {
    let ledger = TestLedger::new();
    let source = ledger.wallet_with_usd(10_000);
    let dest_one = ledger.wallet_with_usd(0);
    let dest_two = ledger.wallet_with_usd(0);

    let service = Arc::new(TransferService::new(ledger.store.clone()));

    let results: Vec<_> = [dest_one, dest_two]
        .into_iter()
        .map(|dest| {
            let service = service.clone();
            thread::spawn(move || service.transfer(source, dest, 6_000, &usd()))
        })
        .collect::<Vec<_>>()
        .into_iter()
        .map(|h| h.join().unwrap())
        .collect();

    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(succeeded, 1, "exactly one racing transfer must win");
    let loser = results.iter().find(|r| r.is_err()).unwrap();
    assert!(matches!(
        loser.as_ref().unwrap_err(),
        LedgerError::InsufficientFunds { .. }
    ));

    let remaining = ledger.usd_amount(source);
    assert_eq!(remaining, 4_000);
    assert!(remaining >= 0);
    let delivered = ledger.usd_amount(dest_one) + ledger.usd_amount(dest_two);
    assert_eq!(delivered, 6_000);
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        ..ProptestConfig::default()
    })]

    /// Conservation: whatever sequence of transfers runs between two
    /// wallets, the per-currency total across them never changes and no
    /// balance goes negative.
    #[test]
    fn funds_are_conserved_across_transfer_sequences(
        moves in prop::collection::vec((any::<bool>(), 1i64..5_000), 1..30)
    ) {
        let ledger = TestLedger::new();
        let a = ledger.wallet_with_usd(10_000);
        let b = ledger.wallet_with_usd(2_000);

        for (a_to_b, amount) in moves {
            let (from, to) = if a_to_b { (a, b) } else { (b, a) };
            let before_from = ledger.usd_amount(from);
            let before_to = ledger.usd_amount(to);

            match ledger.service.transfer(from, to, amount, &usd()) {
                Ok(result) => {
                    prop_assert_eq!(result.amount, amount);
                    prop_assert_eq!(ledger.usd_amount(from), before_from - amount);
                    prop_assert_eq!(ledger.usd_amount(to), before_to + amount);
                }
                Err(LedgerError::InsufficientFunds { .. }) => {
                    prop_assert_eq!(ledger.usd_amount(from), before_from);
                    prop_assert_eq!(ledger.usd_amount(to), before_to);
                }
                Err(other) => prop_assert!(false, "unexpected error: {other}"),
            }

            prop_assert!(ledger.usd_amount(a) >= 0);
            prop_assert!(ledger.usd_amount(b) >= 0);
            prop_assert_eq!(ledger.usd_amount(a) + ledger.usd_amount(b), 12_000);
        }
    }
}
