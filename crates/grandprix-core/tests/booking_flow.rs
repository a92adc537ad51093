//! End-to-end booking flow: register, book, pay, report.

use chrono::NaiveDate;
use grandprix_core::account::{Admin, Customer, User};
use grandprix_core::booking::{BookingOutcome, BookingRequest, BookingSystem};
use grandprix_core::event::Event;
use grandprix_core::money::Money;
use grandprix_core::order::{Order, OrderStatus};
use grandprix_core::payment::{Payment, PaymentMethod, PaymentStatus};
use grandprix_core::ticket::{
    MembershipLevel, PackageType, Priceable, SeasonMembership, Ticket, TicketBase, WeekendPackage,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn standard(id: &str, major: i64) -> Ticket {
    TicketBase::new(id, Money::from_major_minor(major, 0), date(2025, 12, 1))
        .unwrap()
        .into()
}

fn system_with_admin() -> BookingSystem {
    let mut system = BookingSystem::new();

    let salama = User::new("1", "salama1", "pass123", "salama@email.com", "0501111111").unwrap();
    system
        .register_customer(Customer::new(salama, "Salama", "Alneyadi").unwrap())
        .unwrap();

    let admin = User::new("99", "adminuser", "adminpass", "admin@email.com", "0500000000").unwrap();
    system.register_admin(Admin::new(admin, "STAFF001").unwrap()).unwrap();
    system.directory_mut().assign_customer("99", "1").unwrap();

    system.add_event(Event::new("E1", "Grand Prix Final", date(2025, 12, 1), "Yas Marina", 100));
    system
}

#[test]
fn two_tickets_show_up_in_the_admin_report() {
    let today = date(2025, 11, 1);
    let mut system = system_with_admin();

    let request = BookingRequest {
        customer_id: "1".to_string(),
        event_id: "E1".to_string(),
        tickets: vec![standard("201", 100), standard("202", 150)],
        payment: Payment::new(
            "101",
            Money::zero(),
            today,
            PaymentMethod::CreditCard {
                card_number: "1234567812345678".to_string(),
                cardholder_name: "Salama Alneyadi".to_string(),
                expiry_date: date(2027, 12, 31),
                cvv: "123".to_string(),
            },
        )
        .unwrap(),
        discount_code: None,
    };

    let outcome = system.book_tickets(request, today).unwrap();
    let BookingOutcome::Booked { total, .. } = outcome else {
        panic!("booking was not completed: {:?}", outcome);
    };
    assert_eq!(total, Money::from_major_minor(250, 0));

    let report = system.sales_report("99").unwrap();
    assert_eq!(report.total_sales, Money::from_major_minor(250, 0));
    assert_eq!(report.tickets_sold, 2);

    let order = &system.directory().customer("1").unwrap().order_history()[0];
    assert_eq!(order.status(), OrderStatus::Paid);
    assert_eq!(order.payment().status(), PaymentStatus::Processed);
}

#[test]
fn admin_discount_applies_to_later_orders_only() {
    let today = date(2025, 11, 1);
    let mut system = system_with_admin();

    let mut first = Order::new(
        "A",
        "1",
        today,
        Payment::new("PA", Money::zero(), today, PaymentMethod::Direct).unwrap(),
    );
    first.add_ticket(standard("301", 200));
    system.directory_mut().place_order(first).unwrap();

    system.directory_mut().modify_discounts("99", 25.0).unwrap();

    let mut second = Order::new(
        "B",
        "1",
        today,
        Payment::new("PB", Money::zero(), today, PaymentMethod::Direct).unwrap(),
    );
    second.add_ticket(standard("302", 200));
    let paid = system.directory_mut().place_order(second).unwrap();
    assert_eq!(paid, Money::from_major_minor(150, 0));

    let report = system.sales_report("99").unwrap();
    assert_eq!(report.total_sales, Money::from_major_minor(350, 0));
    assert_eq!(report.tickets_sold, 2);
}

#[test]
fn mixed_ticket_order_prices_each_variant() {
    let today = date(2025, 5, 10);
    let base = |id: &str, major: i64| TicketBase::new(id, Money::from_major_minor(major, 0), date(2025, 5, 20)).unwrap();

    let season = SeasonMembership::new(base("3001", 100), date(2025, 6, 1), date(2025, 12, 31), MembershipLevel::Vip)
        .unwrap();
    let weekend = WeekendPackage::new(
        base("2001", 300),
        vec!["Friday".into(), "Saturday".into(), "Sunday".into()],
        PackageType::Premium,
    );

    let mut order = Order::new(
        "M-1",
        "1",
        today,
        Payment::new("PM", Money::zero(), today, PaymentMethod::Direct).unwrap(),
    );
    order.add_ticket(season.clone());
    order.add_ticket(weekend.clone());

    assert_eq!(season.calculate_price(), Money::from_major_minor(1050, 0));
    assert_eq!(weekend.calculate_price(), Money::from_major_minor(460, 0));
    assert_eq!(order.total(), Money::from_major_minor(1510, 0));
    assert_eq!(order.payment().amount(), order.total());
}
