//! # Ticket Catalog
//!
//! The ticket variants sold for a race weekend and their pricing rules.
//!
//! ## Variants
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Ticket (closed set)                            │
//! │                                                                         │
//! │  Standard ─────────► base price                                        │
//! │                                                                         │
//! │  SingleRace ───────► base × seat factor                                │
//! │                        VIP ×1.2 │ Premium ×1.1 │ Standard ×1.0         │
//! │                                                                         │
//! │  Weekend ──────────► base × package factor + 50.00 × (days - 1)        │
//! │                        Premium ×1.2 │ Standard ×1.0                    │
//! │                                                                         │
//! │  Season ───────────► base × months × level factor                      │
//! │                        VIP ×1.5 │ Standard ×1.2                        │
//! │                                                                         │
//! │  Every variant carries a TicketBase: id, base price, event date,        │
//! │  availability. Details always include the base fields.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pricing goes through the [`Priceable`] trait. Code that holds a mixed
//! collection uses the [`Ticket`] enum, which forwards to the variant.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::event::Event;
use crate::money::{Money, BPS_SCALE};
use crate::validation::{validate_non_negative, validate_required};

// =============================================================================
// Pricing Factors (basis points)
// =============================================================================

const VIP_SEAT_FACTOR: u32 = 12_000;
const PREMIUM_SEAT_FACTOR: u32 = 11_000;
const PREMIUM_PACKAGE_FACTOR: u32 = 12_000;
const VIP_MEMBERSHIP_FACTOR: u32 = 15_000;
const STANDARD_MEMBERSHIP_FACTOR: u32 = 12_000;

// =============================================================================
// Option Enums
// =============================================================================

/// Where a single-race pass holder sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SeatLocation {
    Vip,
    Premium,
    Standard,
}

impl SeatLocation {
    /// Price multiplier in basis points.
    pub const fn factor_bps(&self) -> u32 {
        match self {
            SeatLocation::Vip => VIP_SEAT_FACTOR,
            SeatLocation::Premium => PREMIUM_SEAT_FACTOR,
            SeatLocation::Standard => BPS_SCALE,
        }
    }
}

/// Weekend package tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PackageType {
    Standard,
    Premium,
}

impl PackageType {
    /// Price multiplier in basis points.
    pub const fn factor_bps(&self) -> u32 {
        match self {
            PackageType::Premium => PREMIUM_PACKAGE_FACTOR,
            PackageType::Standard => BPS_SCALE,
        }
    }
}

/// Season membership tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum MembershipLevel {
    Standard,
    Vip,
}

impl MembershipLevel {
    /// Price multiplier in basis points.
    pub const fn factor_bps(&self) -> u32 {
        match self {
            MembershipLevel::Vip => VIP_MEMBERSHIP_FACTOR,
            MembershipLevel::Standard => STANDARD_MEMBERSHIP_FACTOR,
        }
    }
}

/// Implements case-insensitive `FromStr` and `Display` for an option enum.
///
/// Unknown names are rejected with [`ValidationError::NotAllowed`] rather
/// than silently priced as the cheapest tier.
macro_rules! option_enum_text {
    ($ty:ident, $field:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let name = match self {
                    $($ty::$variant => $name,)+
                };
                write!(f, "{}", name)
            }
        }

        impl FromStr for $ty {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                $(
                    if wanted.eq_ignore_ascii_case($name) {
                        return Ok($ty::$variant);
                    }
                )+
                Err(ValidationError::NotAllowed {
                    field: $field.to_string(),
                    allowed: vec![$($name.to_string()),+],
                })
            }
        }
    };
}

option_enum_text!(SeatLocation, "seat location", {
    Vip => "VIP",
    Premium => "Premium",
    Standard => "Standard",
});

option_enum_text!(PackageType, "package type", {
    Standard => "Standard",
    Premium => "Premium",
});

option_enum_text!(MembershipLevel, "membership level", {
    Standard => "Standard",
    Vip => "VIP",
});

// =============================================================================
// Ticket Base
// =============================================================================

/// Fields shared by every ticket variant.
///
/// Stored records go through [`TicketBase::new`], so an empty id or a
/// negative price fails to load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TicketBaseRecord")]
pub struct TicketBase {
    pub id: String,
    pub base_price: Money,
    pub event_date: NaiveDate,
    pub is_available: bool,
}

impl TicketBase {
    /// Creates an available ticket.
    ///
    /// Fails when the id is empty or the price is negative.
    pub fn new(
        id: impl Into<String>,
        base_price: Money,
        event_date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let id = id.into();
        validate_required("ticket id", &id, 64)?;
        validate_non_negative("base price", base_price)?;

        Ok(Self {
            id,
            base_price,
            event_date,
            is_available: true,
        })
    }

    /// Marks the ticket as (un)available for sale.
    pub fn with_availability(mut self, is_available: bool) -> Self {
        self.is_available = is_available;
        self
    }
}

#[derive(Deserialize)]
struct TicketBaseRecord {
    id: String,
    base_price: Money,
    event_date: NaiveDate,
    is_available: bool,
}

impl TryFrom<TicketBaseRecord> for TicketBase {
    type Error = ValidationError;

    fn try_from(record: TicketBaseRecord) -> Result<Self, Self::Error> {
        Ok(TicketBase::new(record.id, record.base_price, record.event_date)?
            .with_availability(record.is_available))
    }
}

// =============================================================================
// Priceable Capability
// =============================================================================

/// A ticket that can be priced and described.
///
/// Implementors supply the base fields, the price and their variant-specific
/// details. Validity and the full details snapshot come for free.
pub trait Priceable {
    /// The shared ticket fields.
    fn base(&self) -> &TicketBase;

    /// Final price of this ticket. Pure: same input, same answer.
    fn calculate_price(&self) -> Money;

    /// Variant-specific part of the details snapshot.
    fn variant_details(&self) -> VariantDetails;

    /// Ticket id.
    fn id(&self) -> &str {
        &self.base().id
    }

    /// Available and the event has not happened before `today`.
    fn is_valid_on(&self, today: NaiveDate) -> bool {
        let base = self.base();
        base.is_available && base.event_date >= today
    }

    /// [`Priceable::is_valid_on`] evaluated against the local date.
    fn is_valid(&self) -> bool {
        self.is_valid_on(crate::today())
    }

    /// Full snapshot: base fields, validity, final price and variant fields.
    fn details_on(&self, today: NaiveDate) -> TicketDetails {
        let base = self.base();
        TicketDetails {
            id: base.id.clone(),
            base_price: base.base_price,
            event_date: base.event_date,
            is_available: base.is_available,
            is_valid: self.is_valid_on(today),
            final_price: self.calculate_price(),
            variant: self.variant_details(),
        }
    }

    /// [`Priceable::details_on`] evaluated against the local date.
    fn details(&self) -> TicketDetails {
        self.details_on(crate::today())
    }
}

impl Priceable for TicketBase {
    fn base(&self) -> &TicketBase {
        self
    }

    fn calculate_price(&self) -> Money {
        self.base_price
    }

    fn variant_details(&self) -> VariantDetails {
        VariantDetails::Standard
    }
}

// =============================================================================
// Single Race Pass
// =============================================================================

/// Entry to one race day with an assigned seat area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleRacePass {
    pub base: TicketBase,
    pub race_day: String,
    pub seat_location: SeatLocation,
}

impl SingleRacePass {
    pub fn new(base: TicketBase, race_day: impl Into<String>, seat_location: SeatLocation) -> Self {
        Self {
            base,
            race_day: race_day.into(),
            seat_location,
        }
    }
}

impl Priceable for SingleRacePass {
    fn base(&self) -> &TicketBase {
        &self.base
    }

    fn calculate_price(&self) -> Money {
        self.base.base_price.scale_bps(self.seat_location.factor_bps())
    }

    fn variant_details(&self) -> VariantDetails {
        VariantDetails::SingleRace {
            race_day: self.race_day.clone(),
            seat_location: self.seat_location,
        }
    }
}

// =============================================================================
// Weekend Package
// =============================================================================

/// Multi-day access bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekendPackage {
    pub base: TicketBase,
    pub included_days: Vec<String>,
    pub package_type: PackageType,
}

impl WeekendPackage {
    pub fn new(base: TicketBase, included_days: Vec<String>, package_type: PackageType) -> Self {
        Self {
            base,
            included_days,
            package_type,
        }
    }

    /// Surcharge for every day after the first. An empty list costs nothing
    /// extra, never a negative amount.
    pub fn extra_day_surcharge(&self) -> Money {
        let extra_days = self.included_days.len().saturating_sub(1) as i64;
        crate::EXTRA_DAY_SURCHARGE.multiply_quantity(extra_days)
    }
}

impl Priceable for WeekendPackage {
    fn base(&self) -> &TicketBase {
        &self.base
    }

    fn calculate_price(&self) -> Money {
        self.base.base_price.scale_bps(self.package_type.factor_bps()) + self.extra_day_surcharge()
    }

    fn variant_details(&self) -> VariantDetails {
        VariantDetails::Weekend {
            included_days: self.included_days.clone(),
            package_type: self.package_type,
            extra_day_surcharge: self.extra_day_surcharge(),
        }
    }
}

// =============================================================================
// Season Membership
// =============================================================================

/// Access to every race inside a validity window, priced per month.
///
/// ## Invariant
/// `valid_until >= valid_from`. Checked by [`SeasonMembership::new`],
/// [`SeasonMembership::set_validity`] and when a stored record is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SeasonMembershipRecord")]
pub struct SeasonMembership {
    base: TicketBase,
    valid_from: NaiveDate,
    valid_until: NaiveDate,
    membership_level: MembershipLevel,
}

/// Unchecked shape of a stored season membership.
#[derive(Deserialize)]
struct SeasonMembershipRecord {
    base: TicketBase,
    valid_from: NaiveDate,
    valid_until: NaiveDate,
    membership_level: MembershipLevel,
}

impl TryFrom<SeasonMembershipRecord> for SeasonMembership {
    type Error = ValidationError;

    fn try_from(record: SeasonMembershipRecord) -> Result<Self, Self::Error> {
        SeasonMembership::new(
            record.base,
            record.valid_from,
            record.valid_until,
            record.membership_level,
        )
    }
}

fn check_validity_window(from: NaiveDate, until: NaiveDate) -> Result<(), ValidationError> {
    if until < from {
        return Err(ValidationError::InvalidRange {
            field: "membership validity".to_string(),
            from: from.to_string(),
            until: until.to_string(),
        });
    }
    Ok(())
}

impl SeasonMembership {
    pub fn new(
        base: TicketBase,
        valid_from: NaiveDate,
        valid_until: NaiveDate,
        membership_level: MembershipLevel,
    ) -> Result<Self, ValidationError> {
        check_validity_window(valid_from, valid_until)?;
        Ok(Self {
            base,
            valid_from,
            valid_until,
            membership_level,
        })
    }

    pub fn valid_from(&self) -> NaiveDate {
        self.valid_from
    }

    pub fn valid_until(&self) -> NaiveDate {
        self.valid_until
    }

    pub fn membership_level(&self) -> MembershipLevel {
        self.membership_level
    }

    pub fn set_membership_level(&mut self, level: MembershipLevel) {
        self.membership_level = level;
    }

    /// Mutable access to the shared fields (availability, price).
    pub fn base_mut(&mut self) -> &mut TicketBase {
        &mut self.base
    }

    /// Moves the validity window. The old window stays on error.
    pub fn set_validity(&mut self, from: NaiveDate, until: NaiveDate) -> Result<(), ValidationError> {
        check_validity_window(from, until)?;
        self.valid_from = from;
        self.valid_until = until;
        Ok(())
    }

    /// Calendar months touched by the window, both ends inclusive.
    ///
    /// June 1 to December 31 is 7; June 30 to July 1 is 2.
    pub fn month_span(&self) -> i64 {
        let years = (self.valid_until.year() - self.valid_from.year()) as i64;
        let months = self.valid_until.month() as i64 - self.valid_from.month() as i64;
        years * 12 + months + 1
    }

    /// Events inside the validity window that have not happened before `today`.
    pub fn remaining_events<'a>(&self, events: &'a [Event], today: NaiveDate) -> Vec<&'a Event> {
        events
            .iter()
            .filter(|e| e.date >= self.valid_from && e.date <= self.valid_until && e.date >= today)
            .collect()
    }
}

impl Priceable for SeasonMembership {
    fn base(&self) -> &TicketBase {
        &self.base
    }

    fn calculate_price(&self) -> Money {
        self.base
            .base_price
            .multiply_quantity(self.month_span())
            .scale_bps(self.membership_level.factor_bps())
    }

    fn variant_details(&self) -> VariantDetails {
        VariantDetails::Season {
            valid_from: self.valid_from,
            valid_until: self.valid_until,
            membership_level: self.membership_level,
            months: self.month_span(),
        }
    }
}

// =============================================================================
// Ticket (closed sum)
// =============================================================================

/// Any ticket the office sells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Ticket {
    Standard(TicketBase),
    SingleRace(SingleRacePass),
    Weekend(WeekendPackage),
    Season(SeasonMembership),
}

impl Ticket {
    fn as_priceable(&self) -> &dyn Priceable {
        match self {
            Ticket::Standard(t) => t,
            Ticket::SingleRace(t) => t,
            Ticket::Weekend(t) => t,
            Ticket::Season(t) => t,
        }
    }

    /// Mutable access to the shared fields of whichever variant this is.
    pub fn base_mut(&mut self) -> &mut TicketBase {
        match self {
            Ticket::Standard(t) => t,
            Ticket::SingleRace(t) => &mut t.base,
            Ticket::Weekend(t) => &mut t.base,
            Ticket::Season(t) => t.base_mut(),
        }
    }
}

impl Priceable for Ticket {
    fn base(&self) -> &TicketBase {
        self.as_priceable().base()
    }

    fn calculate_price(&self) -> Money {
        self.as_priceable().calculate_price()
    }

    fn variant_details(&self) -> VariantDetails {
        self.as_priceable().variant_details()
    }
}

impl From<TicketBase> for Ticket {
    fn from(t: TicketBase) -> Self {
        Ticket::Standard(t)
    }
}

impl From<SingleRacePass> for Ticket {
    fn from(t: SingleRacePass) -> Self {
        Ticket::SingleRace(t)
    }
}

impl From<WeekendPackage> for Ticket {
    fn from(t: WeekendPackage) -> Self {
        Ticket::Weekend(t)
    }
}

impl From<SeasonMembership> for Ticket {
    fn from(t: SeasonMembership) -> Self {
        Ticket::Season(t)
    }
}

// =============================================================================
// Details Snapshots
// =============================================================================

/// Everything a front end shows about a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TicketDetails {
    pub id: String,
    pub base_price: Money,
    #[ts(as = "String")]
    pub event_date: NaiveDate,
    pub is_available: bool,
    pub is_valid: bool,
    pub final_price: Money,
    pub variant: VariantDetails,
}

/// Variant-specific part of [`TicketDetails`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum VariantDetails {
    Standard,
    SingleRace {
        race_day: String,
        seat_location: SeatLocation,
    },
    Weekend {
        included_days: Vec<String>,
        package_type: PackageType,
        extra_day_surcharge: Money,
    },
    Season {
        #[ts(as = "String")]
        valid_from: NaiveDate,
        #[ts(as = "String")]
        valid_until: NaiveDate,
        membership_level: MembershipLevel,
        months: i64,
    },
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn base(id: &str, major: i64) -> TicketBase {
        TicketBase::new(id, Money::from_major_minor(major, 0), date(2025, 12, 1)).unwrap()
    }

    fn days(names: &[&str]) -> Vec<String> {
        names.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn test_ticket_base_rejects_bad_input() {
        assert!(matches!(
            TicketBase::new("", Money::from_cents(100), date(2025, 1, 1)),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            TicketBase::new("1", Money::from_cents(-1), date(2025, 1, 1)),
            Err(ValidationError::Negative { .. })
        ));
    }

    #[test]
    fn test_single_race_pricing() {
        let vip = SingleRacePass::new(base("1001", 200), "Sunday", SeatLocation::Vip);
        let premium = SingleRacePass::new(base("1002", 200), "Sunday", SeatLocation::Premium);
        let standard = SingleRacePass::new(base("1003", 200), "Sunday", SeatLocation::Standard);

        assert_eq!(vip.calculate_price(), Money::from_major_minor(240, 0));
        assert_eq!(premium.calculate_price(), Money::from_major_minor(220, 0));
        assert_eq!(standard.calculate_price(), Money::from_major_minor(200, 0));
    }

    #[test]
    fn test_weekend_pricing() {
        let premium = WeekendPackage::new(
            base("2001", 300),
            days(&["Friday", "Saturday", "Sunday"]),
            PackageType::Premium,
        );
        // 300 × 1.2 + 2 × 50
        assert_eq!(premium.calculate_price(), Money::from_major_minor(460, 0));

        let standard = WeekendPackage::new(
            base("2002", 300),
            days(&["Saturday", "Sunday"]),
            PackageType::Standard,
        );
        assert_eq!(standard.calculate_price(), Money::from_major_minor(350, 0));
    }

    #[test]
    fn test_weekend_without_days_has_no_surcharge() {
        let pkg = WeekendPackage::new(base("2003", 300), Vec::new(), PackageType::Standard);
        assert!(pkg.extra_day_surcharge().is_zero());
        assert_eq!(pkg.calculate_price(), Money::from_major_minor(300, 0));
    }

    #[test]
    fn test_season_pricing() {
        let vip = SeasonMembership::new(
            base("3001", 100),
            date(2025, 6, 1),
            date(2025, 12, 31),
            MembershipLevel::Vip,
        )
        .unwrap();
        assert_eq!(vip.month_span(), 7);
        assert_eq!(vip.calculate_price(), Money::from_major_minor(1050, 0));

        let standard = SeasonMembership::new(
            base("3002", 100),
            date(2025, 6, 1),
            date(2025, 10, 31),
            MembershipLevel::Standard,
        )
        .unwrap();
        // 100 × 5 × 1.2
        assert_eq!(standard.calculate_price(), Money::from_major_minor(600, 0));
    }

    #[test]
    fn test_season_month_span_crosses_years() {
        let season = SeasonMembership::new(
            base("3003", 10),
            date(2025, 11, 15),
            date(2026, 2, 1),
            MembershipLevel::Standard,
        )
        .unwrap();
        assert_eq!(season.month_span(), 4);
    }

    #[test]
    fn test_season_rejects_inverted_window() {
        let err = SeasonMembership::new(
            base("3004", 100),
            date(2025, 12, 31),
            date(2025, 6, 1),
            MembershipLevel::Vip,
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidRange { .. }));

        let mut season = SeasonMembership::new(
            base("3005", 100),
            date(2025, 6, 1),
            date(2025, 6, 30),
            MembershipLevel::Vip,
        )
        .unwrap();
        assert!(season.set_validity(date(2025, 8, 1), date(2025, 7, 1)).is_err());
        assert_eq!(season.valid_from(), date(2025, 6, 1));
        assert_eq!(season.valid_until(), date(2025, 6, 30));
    }

    #[test]
    fn test_season_rejects_inverted_window_on_load() {
        let json = r#"{
            "base": {"id": "3006", "base_price": 10000, "event_date": "2025-05-20", "is_available": true},
            "valid_from": "2025-12-31",
            "valid_until": "2025-06-01",
            "membership_level": "vip"
        }"#;
        assert!(serde_json::from_str::<SeasonMembership>(json).is_err());
    }

    #[test]
    fn test_ticket_base_rejects_negative_price_on_load() {
        let json = r#"{"id": "201", "base_price": -100, "event_date": "2025-12-01", "is_available": true}"#;
        assert!(serde_json::from_str::<TicketBase>(json).is_err());

        let json = r#"{"kind": "standard", "id": "", "base_price": 100, "event_date": "2025-12-01", "is_available": false}"#;
        assert!(serde_json::from_str::<Ticket>(json).is_err());

        let json = r#"{"id": "201", "base_price": 10000, "event_date": "2025-12-01", "is_available": false}"#;
        let loaded: TicketBase = serde_json::from_str(json).unwrap();
        assert!(!loaded.is_available);
    }

    #[test]
    fn test_season_price_saturates_for_huge_base() {
        let huge = TicketBase::new("3009", Money::from_cents(i64::MAX / 4), date(2025, 5, 20)).unwrap();
        let season = SeasonMembership::new(huge, date(2025, 1, 1), date(2025, 12, 31), MembershipLevel::Vip).unwrap();

        assert_eq!(season.month_span(), 12);
        assert_eq!(season.calculate_price(), Money::from_cents(i64::MAX));
    }

    #[test]
    fn test_remaining_events() {
        let season = SeasonMembership::new(
            base("3001", 100),
            date(2025, 6, 1),
            date(2025, 12, 31),
            MembershipLevel::Vip,
        )
        .unwrap();
        let events = vec![
            Event::new("E1", "Race 1", date(2025, 6, 1), "Yas Marina", 100),
            Event::new("E2", "Race 2", date(2025, 7, 15), "Yas Marina", 100),
            Event::new("E3", "Race 3", date(2025, 10, 5), "Yas Marina", 100),
            Event::new("E4", "Race 4", date(2026, 1, 10), "Yas Marina", 100),
        ];

        let remaining = season.remaining_events(&events, date(2025, 7, 1));
        let ids: Vec<&str> = remaining.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["E2", "E3"]);
    }

    #[test]
    fn test_validity() {
        let ticket = base("4001", 50);
        assert!(ticket.is_valid_on(date(2025, 12, 1)));
        assert!(!ticket.is_valid_on(date(2025, 12, 2)));

        let sold = ticket.with_availability(false);
        assert!(!sold.is_valid_on(date(2025, 1, 1)));
    }

    #[test]
    fn test_details_keep_base_fields() {
        let ticket: Ticket = SingleRacePass::new(base("1001", 200), "Friday", SeatLocation::Vip).into();
        let details = ticket.details_on(date(2025, 11, 1));

        assert_eq!(details.id, "1001");
        assert_eq!(details.base_price, Money::from_major_minor(200, 0));
        assert_eq!(details.event_date, date(2025, 12, 1));
        assert!(details.is_available);
        assert!(details.is_valid);
        assert_eq!(details.final_price, Money::from_major_minor(240, 0));
        assert_eq!(
            details.variant,
            VariantDetails::SingleRace {
                race_day: "Friday".to_string(),
                seat_location: SeatLocation::Vip,
            }
        );
    }

    #[test]
    fn test_option_parsing_is_case_insensitive_and_strict() {
        assert_eq!("vip".parse::<SeatLocation>().unwrap(), SeatLocation::Vip);
        assert_eq!("PREMIUM".parse::<PackageType>().unwrap(), PackageType::Premium);
        assert_eq!(" Vip ".parse::<MembershipLevel>().unwrap(), MembershipLevel::Vip);
        assert!(matches!(
            "Grandstand".parse::<SeatLocation>(),
            Err(ValidationError::NotAllowed { .. })
        ));
        assert_eq!(SeatLocation::Vip.to_string(), "VIP");
    }

    #[test]
    fn test_ticket_enum_serde_keeps_variant() {
        let ticket: Ticket = WeekendPackage::new(
            base("2001", 300),
            days(&["Saturday", "Sunday"]),
            PackageType::Premium,
        )
        .into();
        let json = serde_json::to_string(&ticket).unwrap();
        let back: Ticket = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ticket);
        assert_eq!(back.calculate_price(), Money::from_major_minor(410, 0));
    }

    proptest! {
        #[test]
        fn prop_standard_weekend_adds_flat_surcharge(cents in 0i64..10_000_000, n in 1usize..8) {
            let b = TicketBase::new("p", Money::from_cents(cents), date(2025, 12, 1)).unwrap();
            let pkg = WeekendPackage::new(b, vec!["Day".to_string(); n], PackageType::Standard);
            let expected = Money::from_cents(cents) + crate::EXTRA_DAY_SURCHARGE * (n as i64 - 1);
            prop_assert_eq!(pkg.calculate_price(), expected);
        }

        #[test]
        fn prop_premium_weekend_marks_up_base_only(cents in 0i64..10_000_000, n in 1usize..8) {
            let b = TicketBase::new("p", Money::from_cents(cents), date(2025, 12, 1)).unwrap();
            let pkg = WeekendPackage::new(b, vec!["Day".to_string(); n], PackageType::Premium);
            let expected = Money::from_cents(cents).scale_bps(12_000)
                + crate::EXTRA_DAY_SURCHARGE * (n as i64 - 1);
            prop_assert_eq!(pkg.calculate_price(), expected);
        }
    }
}
