use rand::Rng;
use receipt_points::application::service::ReceiptService;
use receipt_points::domain::points::compute_points;
use receipt_points::domain::receipt::ReceiptId;
use receipt_points::infrastructure::in_memory::InMemoryReceiptStore;
use rust_decimal_macros::dec;

mod common;

#[test]
fn test_adding_a_pair_adds_exactly_five() {
    let mut rng = rand::thread_rng();

    for _ in 0..50 {
        let count = rng.gen_range(1..20usize);
        let cents: i64 = rng.gen_range(0..100_000);
        let total = rust_decimal::Decimal::new(cents, 2);
        let items: Vec<_> = (0..count)
            .map(|i| common::item(&format!("Item #{}", i % 10), dec!(1.00)))
            .collect();

        let base = common::draft("Walgreens", "2022-01-02", "08:13", total, items.clone());

        // two more items that earn nothing from their descriptions
        let mut extended_items = items;
        extended_items.push(common::item("Pepsi", dec!(9.99)));
        extended_items.push(common::item("Pepsi", dec!(9.99)));
        let extended = common::draft("Walgreens", "2022-01-02", "08:13", total, extended_items);

        let before = compute_points(&base.into_receipt(ReceiptId::generate())).unwrap();
        let after = compute_points(&extended.into_receipt(ReceiptId::generate())).unwrap();
        assert_eq!(after, before + 5, "count {} total {}", count, total);
    }
}

#[test]
fn test_computation_is_repeatable() {
    let receipt = common::draft(
        "Target",
        "2022-01-01",
        "13:01",
        dec!(35.35),
        vec![
            common::item("Mountain Dew 12PK", dec!(6.49)),
            common::item("Emils Cheese Pizza", dec!(12.25)),
        ],
    )
    .into_receipt(ReceiptId::generate());

    let first = compute_points(&receipt).unwrap();
    assert_eq!(first, 20);
    assert!((0..100).all(|_| compute_points(&receipt).unwrap() == first));
}

#[tokio::test]
async fn test_points_are_identical_after_round_trip() {
    let service = ReceiptService::new(Box::new(InMemoryReceiptStore::new()));
    let draft = common::draft(
        "M&M Corner Market",
        "2022-03-20",
        "14:33",
        dec!(9.00),
        vec![common::item("Gatorade", dec!(2.25))],
    );

    let expected = compute_points(&draft.clone().into_receipt(ReceiptId::generate())).unwrap();
    let id = service.create_receipt(draft).await.unwrap();

    assert_eq!(expected, 99);
    assert_eq!(service.get_points(id).await.unwrap(), expected);
    assert_eq!(service.get_points(id).await.unwrap(), expected);
}
