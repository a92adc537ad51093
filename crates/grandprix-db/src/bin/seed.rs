//! # Seed Data Generator
//!
//! Populates the database with a demo race weekend.
//!
//! ## Usage
//! ```bash
//! # Seed ./grandprix.db (or $GRANDPRIX_DB_PATH)
//! cargo run -p grandprix-db --bin seed
//!
//! # Specify database path
//! cargo run -p grandprix-db --bin seed -- --db ./data/grandprix.db
//!
//! # Replace existing data
//! cargo run -p grandprix-db --bin seed -- --force
//! ```
//!
//! ## Generated Data
//! - Two customers and one admin looking after both
//! - Three events a few weeks out
//! - Discount codes, one of them already expired
//! - A booking per customer (card and wallet)
//! - Standalone ticket, season ticket, weekend package and wallet payment lists

use chrono::{Duration, NaiveDate};
use std::env;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use grandprix_core::ticket::{
    MembershipLevel, PackageType, Priceable, SeasonMembership, SeatLocation, SingleRacePass, Ticket, TicketBase,
    WeekendPackage,
};
use grandprix_core::{
    Admin, BookingOutcome, BookingRequest, BookingSystem, Customer, Discount, Event, Money, Order, Payment,
    PaymentMethod, User,
};
use grandprix_db::{Database, DbConfig, EntityKind};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,grandprix=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let mut config = DbConfig::from_env();
    let mut force = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.database_path = args[i + 1].clone().into();
                    i += 1;
                }
            }
            "--force" | "-f" => force = true,
            "--help" | "-h" => {
                println!("Grand Prix Booking Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: $GRANDPRIX_DB_PATH or ./grandprix.db)");
                println!("  -f, --force        Replace data that is already there");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🏁 Grand Prix Booking Seed Data Generator");
    println!("=========================================");
    println!("Database: {}", config.database_path.display());
    println!();

    let db = Database::new(config).await?;
    let repo = db.snapshots();

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = repo.count(EntityKind::Users).await?;
    if existing > 0 && !force {
        println!("⚠ Database already has {} users", existing);
        println!("  Skipping seed to avoid overwriting them.");
        println!("  Run with --force to replace.");
        return Ok(());
    }

    let today = grandprix_core::today();
    let mut system = build_system(today)?;

    println!();
    println!("Booking demo orders...");
    for request in demo_bookings(&system, today)? {
        match system.book_tickets(request, today)? {
            BookingOutcome::Booked { order_id, total } => println!("  Booked {} for {}", order_id, total),
            other => println!("  Not booked: {:?}", other),
        }
    }

    let snapshot = system.snapshot();
    repo.save_system(&snapshot).await?;

    let orders: Vec<Order> = snapshot
        .customers
        .iter()
        .flat_map(|c| c.order_history().iter().cloned())
        .collect();
    repo.save_all(EntityKind::Orders, &orders).await?;

    let catalog = catalog(today)?;
    repo.save_all(EntityKind::Tickets, &catalog.tickets).await?;
    repo.save_all(EntityKind::SeasonTickets, &catalog.seasons).await?;
    repo.save_all(EntityKind::WeekendPackages, &catalog.weekends).await?;
    repo.save_all(EntityKind::WalletPayments, &catalog.wallet_payments).await?;

    println!();
    for kind in EntityKind::ALL {
        println!("  {:<17} {} records", kind.as_str(), repo.count(kind).await?);
    }

    println!();
    println!("Season ticket prices:");
    for season in &catalog.seasons {
        println!(
            "  {} {} months → {}",
            season.membership_level(),
            season.month_span(),
            season.calculate_price()
        );
    }

    println!();
    println!("Sales by event:");
    for (name, sold) in system.sales_by_event() {
        println!("  {:<20} {}", name, sold);
    }

    let report = system.sales_report("99")?;
    println!();
    println!(
        "Admin report: {} across {} tickets ({} standing discount)",
        report.total_sales, report.tickets_sold, report.discount
    );

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}

/// Customers, admin, events and discount codes.
fn build_system(today: NaiveDate) -> Result<BookingSystem, Box<dyn std::error::Error>> {
    let mut system = BookingSystem::new();

    let salama = User::new("1", "salama1", "pass123", "salama@email.com", "0501111111")?;
    system.register_customer(Customer::new(salama, "Salama", "Alneyadi")?)?;

    let ghazlan = User::new("2", "ghazlan1", "pass456", "ghazlan@email.com", "0502222222")?;
    system.register_customer(Customer::new(ghazlan, "Ghazlan", "Alketbi")?)?;

    let admin = User::new("99", "adminuser", "adminpass", "admin@email.com", "0500000000")?;
    system.register_admin(Admin::new(admin, "STAFF001")?)?;
    system.directory_mut().assign_customer("99", "1")?;
    system.directory_mut().assign_customer("99", "2")?;

    let weekend = today + Duration::days(30);
    system.add_event(Event::new("E1", "Qualifiers Day", weekend, "Yas Marina Circuit", 80));
    system.add_event(Event::new("E2", "Grand Prix Final", weekend + Duration::days(1), "Yas Marina Circuit", 100));
    system.add_event(Event::new("E3", "Season Closer", today + Duration::days(90), "Yas Marina Circuit", 120));

    system.add_discount(Discount::new(
        "EARLYBIRD",
        15.0,
        today - Duration::days(7),
        today + Duration::days(7),
        true,
    )?)?;
    system.add_discount(Discount::new(
        "LASTSEASON",
        30.0,
        today - Duration::days(400),
        today - Duration::days(300),
        true,
    )?)?;

    println!("✓ Registered 2 customers and 1 admin");
    println!("✓ Listed {} events", system.events().len());
    Ok(system)
}

fn demo_bookings(system: &BookingSystem, today: NaiveDate) -> Result<Vec<BookingRequest>, Box<dyn std::error::Error>> {
    let final_race = system.event("E2").map(|e| e.date).unwrap_or(today);

    let vip = SingleRacePass::new(
        TicketBase::new(new_ticket_id(), Money::from_major_minor(200, 0), final_race)?,
        "Sunday",
        SeatLocation::Vip,
    );
    let grandstand = SingleRacePass::new(
        TicketBase::new(new_ticket_id(), Money::from_major_minor(150, 0), final_race)?,
        "Sunday",
        SeatLocation::Standard,
    );

    let card = Payment::new(
        Uuid::new_v4().to_string(),
        Money::zero(),
        today,
        PaymentMethod::CreditCard {
            card_number: "4111111111111111".to_string(),
            cardholder_name: "Salama Alneyadi".to_string(),
            expiry_date: today + Duration::days(3 * 365),
            cvv: "123".to_string(),
        },
    )?;
    let wallet = Payment::new(
        Uuid::new_v4().to_string(),
        Money::zero(),
        today,
        PaymentMethod::DigitalWallet {
            wallet_id: "WALLET-2002".to_string(),
            provider: "Apple Pay".to_string(),
        },
    )?;

    Ok(vec![
        BookingRequest {
            customer_id: "1".to_string(),
            event_id: "E2".to_string(),
            tickets: vec![vip.into(), grandstand.into()],
            payment: card,
            discount_code: Some("EARLYBIRD".to_string()),
        },
        BookingRequest {
            customer_id: "2".to_string(),
            event_id: "E1".to_string(),
            tickets: vec![Ticket::Standard(TicketBase::new(
                new_ticket_id(),
                Money::from_major_minor(120, 0),
                final_race,
            )?)],
            payment: wallet,
            discount_code: None,
        },
    ])
}

struct Catalog {
    tickets: Vec<Ticket>,
    seasons: Vec<SeasonMembership>,
    weekends: Vec<WeekendPackage>,
    wallet_payments: Vec<Payment>,
}

fn catalog(today: NaiveDate) -> Result<Catalog, Box<dyn std::error::Error>> {
    let race_day = today + Duration::days(31);
    let season_start = today + Duration::days(1);
    let base = |price: i64| TicketBase::new(new_ticket_id(), Money::from_major_minor(price, 0), race_day);

    let tickets = vec![
        Ticket::Standard(base(100)?),
        SingleRacePass::new(base(200)?, "Friday", SeatLocation::Premium).into(),
        SingleRacePass::new(base(200)?, "Saturday", SeatLocation::Vip).into(),
    ];

    let seasons = vec![
        SeasonMembership::new(base(100)?, season_start, season_start + Duration::days(210), MembershipLevel::Vip)?,
        SeasonMembership::new(
            base(100)?,
            season_start,
            season_start + Duration::days(150),
            MembershipLevel::Standard,
        )?,
    ];

    let days = |names: &[&str]| names.iter().map(|d| d.to_string()).collect::<Vec<_>>();
    let weekends = vec![
        WeekendPackage::new(base(300)?, days(&["Friday", "Saturday", "Sunday"]), PackageType::Premium),
        WeekendPackage::new(base(300)?, days(&["Saturday", "Sunday"]), PackageType::Standard),
    ];

    let wallet_payments = vec![
        Payment::new(
            Uuid::new_v4().to_string(),
            Money::from_major_minor(460, 0),
            today,
            PaymentMethod::DigitalWallet {
                wallet_id: "WALLET-1001".to_string(),
                provider: "Samsung Pay".to_string(),
            },
        )?,
        Payment::new(
            Uuid::new_v4().to_string(),
            Money::from_major_minor(350, 0),
            today,
            PaymentMethod::DigitalWallet {
                wallet_id: "WALLET-2002".to_string(),
                provider: "Apple Pay".to_string(),
            },
        )?,
    ];

    println!("✓ Built demo catalog");
    Ok(Catalog {
        tickets,
        seasons,
        weekends,
        wallet_payments,
    })
}

fn new_ticket_id() -> String {
    format!("T-{}", &Uuid::new_v4().simple().to_string()[..8])
}
