//! # Accounts
//!
//! Users, customers, administrators and the directory that holds them.
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              Directory                                  │
//! │                                                                         │
//! │   customers: Vec<Customer>              admins: Vec<Admin>              │
//! │   ┌──────────────────────┐              ┌──────────────────────┐        │
//! │   │ user                 │◄── by id ────│ customer_ids         │        │
//! │   │ order_history (owned)│              │ discount_rate        │        │
//! │   │ discount ◄───────────┼── set by ────│ total_sales (cache)  │        │
//! │   └──────────────────────┘              │ tickets_sold (cache) │        │
//! │                                         └──────────────────────┘        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An admin never owns customers. It keeps their ids and is handed the
//! customer list whenever it needs to read or update them. The sales caches
//! are rebuilt from the order histories on every report.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{Money, Percentage};
use crate::order::Order;
use crate::validation::{validate_email, validate_phone, validate_required, validate_username};

// =============================================================================
// User
// =============================================================================

/// Login identity shared by customers and admins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password: String,
    pub email: String,
    pub phone: String,
}

/// Profile fields to change. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl User {
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let user = Self {
            id: id.into(),
            username: username.into(),
            password: password.into(),
            email: email.into(),
            phone: phone.into(),
        };
        validate_required("user id", &user.id, 64)?;
        validate_username(&user.username)?;
        validate_required("password", &user.password, 128)?;
        validate_email(&user.email)?;
        validate_phone(&user.phone)?;
        Ok(user)
    }

    /// Plain credential comparison.
    pub fn login(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }

    /// Applies every field of `update` or none of them.
    pub fn update_profile(&mut self, update: UserUpdate) -> Result<(), ValidationError> {
        if let Some(username) = &update.username {
            validate_username(username)?;
        }
        if let Some(password) = &update.password {
            validate_required("password", password, 128)?;
        }
        if let Some(email) = &update.email {
            validate_email(email)?;
        }
        if let Some(phone) = &update.phone {
            validate_phone(phone)?;
        }

        if let Some(username) = update.username {
            self.username = username;
        }
        if let Some(password) = update.password {
            self.password = password;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(phone) = update.phone {
            self.phone = phone;
        }
        Ok(())
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A ticket buyer with an order history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub user: User,
    pub first_name: String,
    pub last_name: String,
    order_history: Vec<Order>,
    discount: Percentage,
}

impl Customer {
    pub fn new(
        user: User,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let first_name = first_name.into();
        let last_name = last_name.into();
        validate_required("first name", &first_name, 100)?;
        validate_required("last name", &last_name, 100)?;

        Ok(Self {
            user,
            first_name,
            last_name,
            order_history: Vec::new(),
            discount: Percentage::ZERO,
        })
    }

    pub fn id(&self) -> &str {
        &self.user.id
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Past orders, oldest first.
    pub fn order_history(&self) -> &[Order] {
        &self.order_history
    }

    /// Standing discount set by an admin.
    pub fn discount(&self) -> Percentage {
        self.discount
    }

    pub fn set_discount(&mut self, discount: Percentage) {
        self.discount = discount;
    }

    /// Records an order, taking the standing discount off its total first.
    /// An order that already carries a standing discount keeps its total.
    ///
    /// Returns the amount the customer pays.
    ///
    /// ## Errors
    /// `CustomerMismatch` if the order was built for another customer. The
    /// history is unchanged in that case.
    pub fn place_order(&mut self, mut order: Order) -> CoreResult<Money> {
        if order.customer_id() != self.id() {
            return Err(CoreError::CustomerMismatch {
                order_id: order.id().to_string(),
                expected: order.customer_id().to_string(),
                actual: self.id().to_string(),
            });
        }

        order.apply_percentage(self.discount);
        let paid = order.total();
        info!(
            customer_id = %self.id(),
            order_id = %order.id(),
            paid = %paid,
            "Order placed"
        );
        self.order_history.push(order);
        Ok(paid)
    }

    pub fn details(&self) -> CustomerDetails {
        CustomerDetails {
            id: self.user.id.clone(),
            username: self.user.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.user.email.clone(),
            phone: self.user.phone.clone(),
            discount: self.discount,
            order_count: self.order_history.len(),
        }
    }
}

/// Customer snapshot for display. Never includes the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerDetails {
    pub id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub discount: Percentage,
    pub order_count: usize,
}

// =============================================================================
// Admin
// =============================================================================

/// Sales figures across every customer an admin looks after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesReport {
    pub total_sales: Money,
    pub tickets_sold: u32,
    pub discount: Percentage,
}

/// Staff member who sets discounts and reads sales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admin {
    pub user: User,
    pub staff_id: String,
    customer_ids: Vec<String>,
    discount_rate: Percentage,
    total_sales: Money,
    tickets_sold: u32,
}

impl Admin {
    pub fn new(user: User, staff_id: impl Into<String>) -> Result<Self, ValidationError> {
        let staff_id = staff_id.into();
        validate_required("staff id", &staff_id, 32)?;

        Ok(Self {
            user,
            staff_id,
            customer_ids: Vec::new(),
            discount_rate: Percentage::ZERO,
            total_sales: Money::zero(),
            tickets_sold: 0,
        })
    }

    pub fn id(&self) -> &str {
        &self.user.id
    }

    pub fn customer_ids(&self) -> &[String] {
        &self.customer_ids
    }

    pub fn discount_rate(&self) -> Percentage {
        self.discount_rate
    }

    /// Starts looking after a customer. Returns `false` if already known.
    pub fn add_customer(&mut self, customer_id: impl Into<String>) -> bool {
        let customer_id = customer_id.into();
        if self.customer_ids.contains(&customer_id) {
            return false;
        }
        self.customer_ids.push(customer_id);
        true
    }

    /// Stops looking after a customer.
    pub fn remove_customer(&mut self, customer_id: &str) -> bool {
        let before = self.customer_ids.len();
        self.customer_ids.retain(|id| id != customer_id);
        self.customer_ids.len() != before
    }

    fn manages(&self, customer: &Customer) -> bool {
        self.customer_ids.iter().any(|id| id == customer.id())
    }

    /// The known customers found in `customers`, in list order.
    pub fn view_all_customers<'a>(&self, customers: &'a [Customer]) -> Vec<&'a Customer> {
        customers.iter().filter(|c| self.manages(c)).collect()
    }

    /// Sets the same discount on every known customer.
    ///
    /// ## Errors
    /// `OutOfRange` if `rate` is outside 0 to 100. Nobody is updated then.
    pub fn modify_discounts(&mut self, rate: f64, customers: &mut [Customer]) -> Result<(), ValidationError> {
        let rate = Percentage::from_percent(rate)?;
        self.discount_rate = rate;

        let mut updated = 0usize;
        for customer in customers.iter_mut() {
            if self.customer_ids.iter().any(|id| id == customer.id()) {
                customer.set_discount(rate);
                updated += 1;
            }
        }
        info!(admin_id = %self.id(), rate = %rate, updated, "Customer discounts changed");
        Ok(())
    }

    /// Tickets across every known customer's full order history.
    pub fn track_ticket_sales(&mut self, customers: &[Customer]) -> u32 {
        self.tickets_sold = customers
            .iter()
            .filter(|c| self.manages(c))
            .flat_map(|c| c.order_history())
            .map(|o| o.ticket_count() as u32)
            .sum();
        self.tickets_sold
    }

    /// Recomputes both totals from the order histories and reports them.
    pub fn view_sales_report(&mut self, customers: &[Customer]) -> SalesReport {
        self.total_sales = customers
            .iter()
            .filter(|c| self.manages(c))
            .flat_map(|c| c.order_history())
            .map(|o| o.payment().amount())
            .sum();
        self.track_ticket_sales(customers);
        debug!(admin_id = %self.id(), total = %self.total_sales, tickets = self.tickets_sold, "Sales recomputed");

        SalesReport {
            total_sales: self.total_sales,
            tickets_sold: self.tickets_sold,
            discount: self.discount_rate,
        }
    }
}

// =============================================================================
// Directory
// =============================================================================

/// Every registered customer and admin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directory {
    customers: Vec<Customer>,
    admins: Vec<Admin>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a directory from stored lists, rejecting duplicate ids or
    /// usernames the same way registration does.
    pub fn from_parts(customers: Vec<Customer>, admins: Vec<Admin>) -> Result<Self, ValidationError> {
        let mut directory = Self::new();
        for customer in customers {
            directory.register_customer(customer)?;
        }
        for admin in admins {
            directory.register_admin(admin)?;
        }
        Ok(directory)
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn admins(&self) -> &[Admin] {
        &self.admins
    }

    fn users(&self) -> impl Iterator<Item = &User> {
        self.customers
            .iter()
            .map(|c| &c.user)
            .chain(self.admins.iter().map(|a| &a.user))
    }

    fn check_unique(&self, user: &User) -> Result<(), ValidationError> {
        for existing in self.users() {
            if existing.id == user.id {
                return Err(ValidationError::Duplicate {
                    field: "user id".to_string(),
                    value: user.id.clone(),
                });
            }
            if existing.username == user.username {
                return Err(ValidationError::Duplicate {
                    field: "username".to_string(),
                    value: user.username.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn register_customer(&mut self, customer: Customer) -> Result<(), ValidationError> {
        self.check_unique(&customer.user)?;
        info!(user_id = %customer.id(), username = %customer.user.username, "Customer registered");
        self.customers.push(customer);
        Ok(())
    }

    pub fn register_admin(&mut self, admin: Admin) -> Result<(), ValidationError> {
        self.check_unique(&admin.user)?;
        info!(user_id = %admin.id(), staff_id = %admin.staff_id, "Admin registered");
        self.admins.push(admin);
        Ok(())
    }

    pub fn customer(&self, id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id() == id)
    }

    pub fn customer_mut(&mut self, id: &str) -> Option<&mut Customer> {
        self.customers.iter_mut().find(|c| c.id() == id)
    }

    pub fn admin(&self, id: &str) -> Option<&Admin> {
        self.admins.iter().find(|a| a.id() == id)
    }

    pub fn admin_mut(&mut self, id: &str) -> Option<&mut Admin> {
        self.admins.iter_mut().find(|a| a.id() == id)
    }

    pub fn find_by_username(&self, username: &str) -> Option<&User> {
        self.users().find(|u| u.username == username)
    }

    /// The matching user, or `None` on unknown username or wrong password.
    pub fn login(&self, username: &str, password: &str) -> Option<&User> {
        let user = self.users().find(|u| u.login(username, password));
        match user {
            Some(u) => info!(user_id = %u.id, "Login succeeded"),
            None => debug!(username, "Login failed"),
        }
        user
    }

    fn user_mut(&mut self, id: &str) -> Option<&mut User> {
        if let Some(c) = self.customers.iter_mut().find(|c| c.user.id == id) {
            return Some(&mut c.user);
        }
        self.admins.iter_mut().find(|a| a.user.id == id).map(|a| &mut a.user)
    }

    /// Updates a user's profile. A new username must still be unique.
    pub fn update_profile(&mut self, user_id: &str, update: UserUpdate) -> CoreResult<()> {
        if let Some(username) = &update.username {
            if self.users().any(|u| u.username == *username && u.id != user_id) {
                return Err(ValidationError::Duplicate {
                    field: "username".to_string(),
                    value: username.clone(),
                }
                .into());
            }
        }

        let user = self
            .user_mut(user_id)
            .ok_or_else(|| CoreError::CustomerNotFound(user_id.to_string()))?;
        user.update_profile(update)?;
        Ok(())
    }

    /// Removes a customer or admin. Admins forget a deleted customer.
    pub fn delete_account(&mut self, user_id: &str) -> bool {
        let before = self.customers.len() + self.admins.len();
        self.customers.retain(|c| c.id() != user_id);
        self.admins.retain(|a| a.id() != user_id);
        for admin in &mut self.admins {
            admin.remove_customer(user_id);
        }

        let removed = self.customers.len() + self.admins.len() != before;
        if removed {
            info!(user_id, "Account deleted");
        }
        removed
    }

    /// Puts a registered customer under an admin.
    pub fn assign_customer(&mut self, admin_id: &str, customer_id: &str) -> CoreResult<bool> {
        if self.customer(customer_id).is_none() {
            return Err(CoreError::CustomerNotFound(customer_id.to_string()));
        }
        let admin = self
            .admin_mut(admin_id)
            .ok_or_else(|| CoreError::AdminNotFound(admin_id.to_string()))?;
        Ok(admin.add_customer(customer_id))
    }

    /// Records an order in its customer's history.
    pub fn place_order(&mut self, order: Order) -> CoreResult<Money> {
        let customer_id = order.customer_id().to_string();
        let customer = self
            .customer_mut(&customer_id)
            .ok_or(CoreError::CustomerNotFound(customer_id))?;
        customer.place_order(order)
    }

    /// [`Admin::modify_discounts`] over this directory's customers.
    pub fn modify_discounts(&mut self, admin_id: &str, rate: f64) -> CoreResult<()> {
        let admin = self
            .admins
            .iter_mut()
            .find(|a| a.user.id == admin_id)
            .ok_or_else(|| CoreError::AdminNotFound(admin_id.to_string()))?;
        admin.modify_discounts(rate, &mut self.customers)?;
        Ok(())
    }

    /// [`Admin::view_sales_report`] over this directory's customers.
    pub fn sales_report(&mut self, admin_id: &str) -> CoreResult<SalesReport> {
        let admin = self
            .admins
            .iter_mut()
            .find(|a| a.user.id == admin_id)
            .ok_or_else(|| CoreError::AdminNotFound(admin_id.to_string()))?;
        Ok(admin.view_sales_report(&self.customers))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::{Payment, PaymentMethod};
    use crate::ticket::TicketBase;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn salama() -> Customer {
        let user = User::new("1", "salama1", "pass123", "salama@email.com", "0501111111").unwrap();
        Customer::new(user, "Salama", "Alneyadi").unwrap()
    }

    fn ghazlan() -> Customer {
        let user = User::new("2", "ghazlan1", "pass456", "ghazlan@email.com", "0502222222").unwrap();
        Customer::new(user, "Ghazlan", "Alketbi").unwrap()
    }

    fn admin() -> Admin {
        let user = User::new("99", "adminuser", "adminpass", "admin@email.com", "0500000000").unwrap();
        Admin::new(user, "STAFF001").unwrap()
    }

    fn order(id: &str, customer_id: &str, prices: &[i64]) -> Order {
        let payment = Payment::new(format!("P-{}", id), Money::zero(), date(2025, 5, 10), PaymentMethod::Direct)
            .unwrap();
        let mut order = Order::new(id, customer_id, date(2025, 5, 10), payment);
        for (i, major) in prices.iter().enumerate() {
            let ticket = TicketBase::new(
                format!("{}-{}", id, i),
                Money::from_major_minor(*major, 0),
                date(2025, 12, 1),
            )
            .unwrap();
            order.add_ticket(ticket);
        }
        order
    }

    fn directory() -> Directory {
        let mut dir = Directory::new();
        dir.register_customer(salama()).unwrap();
        dir.register_customer(ghazlan()).unwrap();
        dir.register_admin(admin()).unwrap();
        dir.assign_customer("99", "1").unwrap();
        dir.assign_customer("99", "2").unwrap();
        dir
    }

    #[test]
    fn test_user_validation() {
        assert!(User::new("1", "", "p", "a@b.com", "0501111111").is_err());
        assert!(User::new("1", "u", "p", "not-an-email", "0501111111").is_err());
        assert!(User::new("1", "u", "", "a@b.com", "0501111111").is_err());
    }

    #[test]
    fn test_update_profile_is_all_or_nothing() {
        let mut user = salama().user;
        let update = UserUpdate {
            email: Some("new@email.com".to_string()),
            phone: Some("bad phone".to_string()),
            ..Default::default()
        };
        assert!(user.update_profile(update).is_err());
        assert_eq!(user.email, "salama@email.com");

        let update = UserUpdate {
            email: Some("new@email.com".to_string()),
            ..Default::default()
        };
        user.update_profile(update).unwrap();
        assert_eq!(user.email, "new@email.com");
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut dir = directory();

        let err = dir.register_customer(salama()).unwrap_err();
        assert!(matches!(err, ValidationError::Duplicate { .. }));

        let user = User::new("3", "salama1", "x", "x@email.com", "0503333333").unwrap();
        let same_name = Customer::new(user, "Other", "Person").unwrap();
        assert!(matches!(
            dir.register_customer(same_name),
            Err(ValidationError::Duplicate { field, .. }) if field == "username"
        ));
    }

    #[test]
    fn test_lookup_and_login() {
        let dir = directory();
        assert!(dir.customer("1").is_some());
        assert!(dir.customer("404").is_none());
        assert_eq!(dir.find_by_username("adminuser").map(|u| u.id.as_str()), Some("99"));

        assert!(dir.login("salama1", "pass123").is_some());
        assert!(dir.login("salama1", "wrong").is_none());
        assert!(dir.login("nobody", "pass123").is_none());
    }

    #[test]
    fn test_update_profile_rejects_taken_username() {
        let mut dir = directory();
        let update = UserUpdate {
            username: Some("ghazlan1".to_string()),
            ..Default::default()
        };
        assert!(dir.update_profile("1", update).is_err());
        assert_eq!(dir.customer("1").unwrap().user.username, "salama1");
    }

    #[test]
    fn test_delete_account() {
        let mut dir = directory();
        assert!(dir.delete_account("2"));
        assert!(!dir.delete_account("2"));
        assert!(dir.customer("2").is_none());
        assert_eq!(dir.admin("99").unwrap().customer_ids(), &["1".to_string()]);
    }

    #[test]
    fn test_place_order_checks_owner() {
        let mut customer = salama();
        let err = customer.place_order(order("5001", "2", &[100])).unwrap_err();
        assert!(matches!(err, CoreError::CustomerMismatch { .. }));
        assert!(customer.order_history().is_empty());
    }

    #[test]
    fn test_place_order_applies_standing_discount() {
        let mut customer = salama();
        customer.set_discount(Percentage::from_percent(10.0).unwrap());

        let paid = customer.place_order(order("5001", "1", &[30, 20])).unwrap();
        assert_eq!(paid, Money::from_major_minor(45, 0));
        assert_eq!(customer.order_history()[0].payment().amount(), paid);
    }

    #[test]
    fn test_modify_discounts() {
        let mut dir = directory();
        assert!(dir.modify_discounts("99", 120.0).is_err());
        assert!(dir.customer("1").unwrap().discount().is_zero());

        dir.modify_discounts("99", 10.0).unwrap();
        assert_eq!(dir.customer("1").unwrap().discount().bps(), 1000);
        assert_eq!(dir.customer("2").unwrap().discount().bps(), 1000);
        assert!(matches!(
            dir.modify_discounts("nobody", 5.0),
            Err(CoreError::AdminNotFound(_))
        ));
    }

    #[test]
    fn test_sales_report_recomputes_from_history() {
        let mut dir = directory();
        dir.place_order(order("A", "1", &[50, 50, 50])).unwrap();
        dir.place_order(order("B", "2", &[50, 50])).unwrap();

        dir.modify_discounts("99", 10.0).unwrap();
        dir.place_order(order("C", "1", &[50])).unwrap();
        dir.place_order(order("D", "2", &[70])).unwrap();

        let report = dir.sales_report("99").unwrap();
        // 150 + 100 + 45 + 63
        assert_eq!(report.total_sales, Money::from_major_minor(358, 0));
        assert_eq!(report.tickets_sold, 7);
        assert_eq!(report.discount.bps(), 1000);

        // Asking again gives the same answer
        assert_eq!(dir.sales_report("99").unwrap(), report);
    }

    #[test]
    fn test_view_all_customers() {
        let mut dir = directory();
        let user = User::new("7", "stranger", "pw", "s@email.com", "0507777777").unwrap();
        dir.register_customer(Customer::new(user, "Not", "Managed").unwrap()).unwrap();

        let admin = dir.admin("99").unwrap();
        let managed: Vec<&str> = admin
            .view_all_customers(dir.customers())
            .iter()
            .map(|c| c.id())
            .collect();
        assert_eq!(managed, vec!["1", "2"]);
    }
}
