//! Entity catalog: known business entities and the tables that back them.

use std::fmt;

/// Business entities with an explicit table mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Entity {
    Client,
    Company,
    Gst,
    GstMonthlyStatus,
    Invoice,
    InvoiceItem,
    PaymentTracker,
    Sales,
}

impl Entity {
    pub const ALL: [Entity; 8] = [
        Entity::Client,
        Entity::Company,
        Entity::Gst,
        Entity::GstMonthlyStatus,
        Entity::Invoice,
        Entity::InvoiceItem,
        Entity::PaymentTracker,
        Entity::Sales,
    ];

    /// Name used in API paths (case-sensitive).
    pub fn name(self) -> &'static str {
        match self {
            Entity::Client => "Client",
            Entity::Company => "Company",
            Entity::Gst => "GST",
            Entity::GstMonthlyStatus => "GSTMonthlyStatus",
            Entity::Invoice => "Invoice",
            Entity::InvoiceItem => "InvoiceItem",
            Entity::PaymentTracker => "PaymentTracker",
            Entity::Sales => "Sales",
        }
    }

    pub fn table(self) -> &'static str {
        match self {
            Entity::Client => "clients",
            Entity::Company => "companies",
            Entity::Gst => "gsts",
            Entity::GstMonthlyStatus => "gst_monthly_statuses",
            Entity::Invoice => "invoices",
            Entity::InvoiceItem => "invoice_items",
            Entity::PaymentTracker => "payment_trackers",
            Entity::Sales => "sales",
        }
    }

    pub fn from_name(name: &str) -> Option<Entity> {
        Entity::ALL.into_iter().find(|e| e.name() == name)
    }

    /// Single query parameter this entity accepts as an equality filter on list.
    pub fn list_filter(self) -> Option<&'static str> {
        match self {
            Entity::PaymentTracker => Some("barcode"),
            Entity::InvoiceItem => Some("invoice_id"),
            _ => None,
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An entity name from a request: either a catalog entry or a name that falls back to naive pluralization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntityRef {
    Known(Entity),
    /// Table is `lowercase(name) + "s"`. Wrong for irregular plurals.
    Unmapped(String),
}

impl EntityRef {
    pub fn parse(name: &str) -> EntityRef {
        match Entity::from_name(name) {
            Some(e) => EntityRef::Known(e),
            None => EntityRef::Unmapped(name.to_string()),
        }
    }

    pub fn table(&self) -> String {
        match self {
            EntityRef::Known(e) => e.table().to_string(),
            EntityRef::Unmapped(name) => {
                let table = format!("{}s", name.to_lowercase());
                tracing::warn!(entity = %name, table = %table, "entity not in catalog; using pluralized table name");
                table
            }
        }
    }

    pub fn list_filter(&self) -> Option<&'static str> {
        match self {
            EntityRef::Known(e) => e.list_filter(),
            EntityRef::Unmapped(_) => None,
        }
    }
}

/// Resolve an API entity name to its table name.
pub fn resolve(name: &str) -> String {
    EntityRef::parse(name).table()
}
