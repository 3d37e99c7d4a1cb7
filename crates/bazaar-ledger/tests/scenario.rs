use std::sync::Arc;
use std::thread;

use bazaar_ledger::{
    AccountId, Amount, Holder, InMemoryMarketplace, InMemorySettlement, ItemId, MarketConfig,
    MarketError, MarketReader, MarketWriter, Settlement,
};

const TOKEN_URI: &str = "https://example.com/token-uri";

struct Fixture {
    market: InMemoryMarketplace,
    book: Arc<InMemorySettlement>,
    seller: AccountId,
    buyer1: AccountId,
    buyer2: AccountId,
    fee: Amount,
    price: Amount,
}

/// Fresh marketplace with one item listed by `seller` at 1.0.
fn setup() -> Fixture {
    let book = Arc::new(InMemorySettlement::new());
    let fee = Amount::parse("0.1").unwrap();
    let market = InMemoryMarketplace::new(
        MarketConfig::new(AccountId::from_label("owner"), fee),
        book.clone(),
    );
    let seller = AccountId::from_label("seller");
    let price = Amount::parse("1.0").unwrap();
    market
        .create_and_list(&seller, TOKEN_URI, price, fee)
        .unwrap();

    Fixture {
        market,
        book,
        seller,
        buyer1: AccountId::from_label("buyer1"),
        buyer2: AccountId::from_label("buyer2"),
        fee,
        price,
    }
}

#[test]
fn creates_and_lists_an_item() {
    let f = setup();
    let id = ItemId::new(f.market.item_count().unwrap());
    assert_eq!(id, ItemId::FIRST);

    let listing = f.market.get_item(id).unwrap().unwrap();
    assert_eq!(listing.id, id);
    assert_eq!(listing.seller, Some(f.seller));
    assert_eq!(listing.owner, Holder::Marketplace);
    assert_eq!(listing.price, f.price);
    assert!(!listing.sold);
}

#[test]
fn buyer_purchases_an_item() {
    let f = setup();
    f.market.buy(&f.buyer1, ItemId::FIRST, f.price).unwrap();

    let listing = f.market.get_item(ItemId::FIRST).unwrap().unwrap();
    assert_eq!(listing.owner, Holder::Account(f.buyer1));
    assert!(listing.sold);
    assert_eq!(f.book.balance_of(&f.seller), f.price);
}

#[test]
fn owner_resells_an_item() {
    let f = setup();
    let new_price = Amount::parse("2.0").unwrap();
    f.market.buy(&f.buyer1, ItemId::FIRST, f.price).unwrap();
    f.market
        .resell(&f.buyer1, ItemId::FIRST, new_price, f.fee)
        .unwrap();

    let listing = f.market.get_item(ItemId::FIRST).unwrap().unwrap();
    assert_eq!(listing.seller, Some(f.buyer1));
    assert_eq!(listing.owner, Holder::Marketplace);
    assert_eq!(listing.price, new_price);
    assert!(!listing.sold);
}

#[test]
fn fetches_unsold_items() {
    let f = setup();
    let unsold = f.market.fetch_unsold().unwrap();
    assert_eq!(unsold.len() as u64, f.market.item_count().unwrap());
    assert_eq!(unsold[0].id, ItemId::FIRST);
    assert_eq!(unsold[0].seller, Some(f.seller));
    assert_eq!(unsold[0].owner, Holder::Marketplace);
    assert_eq!(unsold[0].price, f.price);
    assert!(!unsold[0].sold);
}

#[test]
fn fetches_items_purchased_by_a_user() {
    let f = setup();
    f.market.buy(&f.buyer1, ItemId::FIRST, f.price).unwrap();

    let owned = f.market.fetch_owned_by(&f.buyer1).unwrap();
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].id, ItemId::FIRST);
    assert_eq!(owned[0].seller, None);
    assert_eq!(owned[0].owner, Holder::Account(f.buyer1));
    assert_eq!(owned[0].price, f.price);
    assert!(owned[0].sold);
    assert!(f.market.fetch_owned_by(&f.buyer2).unwrap().is_empty());
}

#[test]
fn fetches_items_listed_by_a_user() {
    let f = setup();
    let listed = f.market.fetch_listed_by(&f.seller).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, ItemId::FIRST);
    assert_eq!(listed[0].seller, Some(f.seller));
    assert_eq!(listed[0].owner, Holder::Marketplace);
    assert!(!listed[0].sold);

    f.market.buy(&f.buyer1, ItemId::FIRST, f.price).unwrap();
    assert!(f.market.fetch_listed_by(&f.seller).unwrap().is_empty());
}

#[test]
fn ids_are_never_reused_across_cycles() {
    let f = setup();
    let mut holder = f.buyer1;
    f.market.buy(&holder, ItemId::FIRST, f.price).unwrap();
    for round in 0..5u64 {
        let price = Amount::units(round + 2);
        f.market.resell(&holder, ItemId::FIRST, price, f.fee).unwrap();
        holder = if holder == f.buyer1 { f.buyer2 } else { f.buyer1 };
        f.market.buy(&holder, ItemId::FIRST, price).unwrap();
    }

    let next = f
        .market
        .create_and_list(&f.seller, TOKEN_URI, f.price, f.fee)
        .unwrap();
    assert_eq!(next, ItemId::new(2));
    assert!(f.market.validate().unwrap().is_valid());
}

#[test]
fn concurrent_buyers_settle_exactly_once() {
    let f = setup();
    let market = Arc::new(f.market);

    let handles: Vec<_> = (0..8)
        .map(|n| {
            let market = Arc::clone(&market);
            let price = f.price;
            thread::spawn(move || {
                let buyer = AccountId::from_label(format!("racer-{n}"));
                market.buy(&buyer, ItemId::FIRST, price)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let wins = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| *e == MarketError::AlreadySold(ItemId::FIRST)));
    assert_eq!(f.book.balance_of(&f.seller), f.price);
}

#[test]
fn operator_collects_every_listing_fee() {
    let f = setup();
    let operator = AccountId::from_label("owner");
    f.market.buy(&f.buyer1, ItemId::FIRST, f.price).unwrap();
    f.market
        .resell(&f.buyer1, ItemId::FIRST, f.price, f.fee)
        .unwrap();

    assert_eq!(f.market.withdraw_fees(&operator).unwrap(), Amount::parse("0.2").unwrap());
    assert_eq!(f.book.balance_of(&operator), Amount::parse("0.2").unwrap());
    assert_eq!(f.book.total(), Some(Amount::parse("1.2").unwrap()));
}
