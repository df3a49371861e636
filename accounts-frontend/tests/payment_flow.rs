mod common;

use accounts_frontend::forms::state::{LOAD_FAILED_MESSAGE, SUBMIT_FAILED_MESSAGE};
use accounts_frontend::forms::{FormState, PaymentApplicator, ValidationError};
use accounts_frontend::models::{PartyKind, Payment, PaymentDirection, PaymentMethod, Reference};
use accounts_frontend::services::FormError;
use common::{dec, day, invoice, numbering, party, purchase_invoice, FakeGateway};

fn existing_payment(number: &str) -> Payment {
    Payment {
        id: format!("id-{}", number),
        payment_number: number.to_string(),
        direction: PaymentDirection::Outgoing,
        party: Reference::from("s1"),
        party_model: PartyKind::Supplier,
        date: day(1),
        amount: dec("1"),
        method: PaymentMethod::Cash,
        notes: None,
        applied_invoices: Vec::new(),
    }
}

fn supplier_books() -> FakeGateway {
    FakeGateway {
        suppliers: vec![party("s1", "Acme Traders"), party("s2", "Globex")],
        purchase_invoices: vec![
            purchase_invoice("pi1", "PI-001", "s1", "1000", &[]),
            purchase_invoice("pi2", "PI-002", "s1", "500", &["200"]),
            purchase_invoice("pi3", "PI-003", "s1", "300", &["100", "200"]),
            purchase_invoice("pi4", "PI-004", "s2", "100", &[]),
        ],
        payments: vec![existing_payment("PAY00003"), existing_payment("PAY00007")],
        ..FakeGateway::default()
    }
}

#[tokio::test]
async fn supplier_payment_is_spread_over_open_invoices() {
    let gateway = supplier_books();
    let mut form = PaymentApplicator::for_suppliers(day(15));

    form.load(&gateway, &numbering()).await.unwrap();
    assert_eq!(form.payment_number(), "PAY00008");
    assert_eq!(form.state(), &FormState::Ready);

    form.select_party("s1").unwrap();
    let open: Vec<&str> = form.open_invoices().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(open, vec!["pi1", "pi2"]);

    assert!(form.toggle_invoice("pi1").unwrap());
    assert!(form.toggle_invoice("pi2").unwrap());
    assert_eq!(form.total_applied(), dec("1300"));

    form.set_method(PaymentMethod::Bank);
    let created = form.submit(&gateway).await.unwrap();

    assert_eq!(created.payment_number, "PAY00008");
    assert_eq!(form.state(), &FormState::Submitted);

    let sent = gateway.created_payments();
    assert_eq!(sent.len(), 1);
    let payment = &sent[0];
    assert_eq!(payment.direction, PaymentDirection::Outgoing);
    assert_eq!(payment.party, "s1");
    assert_eq!(payment.party_model, PartyKind::Supplier);
    assert_eq!(payment.method, PaymentMethod::Bank);
    assert_eq!(payment.amount, dec("1300"));
    let applied: Vec<(&str, _)> = payment
        .applied_invoices
        .iter()
        .map(|a| (a.invoice.id(), a.amount))
        .collect();
    assert_eq!(applied, vec![("pi1", dec("1000")), ("pi2", dec("300"))]);
}

#[tokio::test]
async fn partial_allocation_is_accepted_up_to_the_remaining_balance() {
    let gateway = supplier_books();
    let mut form = PaymentApplicator::for_suppliers(day(15));
    form.load(&gateway, &numbering()).await.unwrap();
    form.select_party("s1").unwrap();
    form.toggle_invoice("pi2").unwrap();

    let err = form.set_allocation_amount("pi2", "300.01").unwrap_err();
    assert_eq!(
        err,
        ValidationError::ExceedsRemainingBalance {
            invoice_number: "PI-002".to_string(),
            remaining: dec("300"),
        }
    );
    assert_eq!(form.total_applied(), dec("300"));

    form.set_allocation_amount("pi2", "120.50").unwrap();
    form.submit(&gateway).await.unwrap();
    assert_eq!(gateway.created_payments()[0].amount, dec("120.50"));
}

#[tokio::test]
async fn zero_total_is_refused_without_calling_the_backend() {
    let gateway = supplier_books();
    let mut form = PaymentApplicator::for_suppliers(day(15));
    form.load(&gateway, &numbering()).await.unwrap();
    form.select_party("s1").unwrap();
    form.toggle_invoice("pi1").unwrap();
    form.set_allocation_amount("pi1", "").unwrap();

    let err = form.submit(&gateway).await.unwrap_err();
    assert!(matches!(
        err,
        FormError::Validation(ValidationError::NonPositiveTotal)
    ));
    assert!(!gateway.calls().contains(&"create_payment".to_string()));
}

#[tokio::test]
async fn backend_failure_keeps_the_draft() {
    let gateway = FakeGateway {
        fail_writes: true,
        ..supplier_books()
    };
    let mut form = PaymentApplicator::for_suppliers(day(15));
    form.load(&gateway, &numbering()).await.unwrap();
    form.select_party("s1").unwrap();
    form.toggle_invoice("pi1").unwrap();

    let err = form.submit(&gateway).await.unwrap_err();
    assert!(matches!(err, FormError::Gateway(_)));
    assert_eq!(form.state().error(), Some(SUBMIT_FAILED_MESSAGE));
    assert_eq!(form.allocations().len(), 1);
    assert_eq!(form.party(), Some("s1"));
}

#[tokio::test]
async fn load_failure_leaves_the_form_empty() {
    let gateway = FakeGateway {
        fail_reads: true,
        ..supplier_books()
    };
    let mut form = PaymentApplicator::for_suppliers(day(15));

    assert!(form.load(&gateway, &numbering()).await.is_err());
    assert_eq!(form.state().error(), Some(LOAD_FAILED_MESSAGE));
    assert!(form.parties().is_empty());
}

#[tokio::test]
async fn customer_payment_settles_sales_invoices() {
    let gateway = FakeGateway {
        customers: vec![party("c1", "Initech"), party("c2", "Hooli")],
        invoices: vec![
            invoice("i1", "INV-001", "c1", "1000", "400"),
            invoice("i2", "INV-002", "c1", "250", "250"),
            invoice("i3", "INV-003", "c2", "500", "0"),
        ],
        payments: vec![existing_payment("PAY00003")],
        ..FakeGateway::default()
    };
    let mut form = PaymentApplicator::for_customers(day(15));

    form.load(&gateway, &numbering()).await.unwrap();
    assert_eq!(form.party_kind(), PartyKind::Customer);
    assert_eq!(form.payment_number(), "PAY00004");
    assert_eq!(form.parties().len(), 2);
    let mut calls = gateway.calls();
    calls.sort();
    assert_eq!(calls, vec!["list_customers", "list_invoices", "list_payments"]);

    form.select_party("c1").unwrap();
    let open: Vec<&str> = form.open_invoices().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(open, vec!["i1"]);
    assert_eq!(form.remaining_for("i1"), Some(dec("600")));

    assert!(form.toggle_invoice("i1").unwrap());
    form.submit(&gateway).await.unwrap();

    let sent = gateway.created_payments();
    assert_eq!(sent[0].direction, PaymentDirection::Incoming);
    assert_eq!(sent[0].party_model, PartyKind::Customer);
    assert_eq!(sent[0].amount, dec("600"));
}

#[tokio::test]
async fn first_payment_gets_number_one() {
    let gateway = FakeGateway {
        payments: Vec::new(),
        ..supplier_books()
    };
    let mut form = PaymentApplicator::for_suppliers(day(15));
    form.load(&gateway, &numbering()).await.unwrap();
    assert_eq!(form.payment_number(), "PAY00001");
}
