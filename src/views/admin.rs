//! Admin dashboard mock: stat tiles, recent orders and the sidebar menu.
//!
//! All figures are fixed sample data.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Accent {
    Purple,
    Blue,
    Teal,
    Orange,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatTile {
    pub label: &'static str,
    pub value: &'static str,
    pub icon: &'static str,
    pub accent: Accent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OrderStatus {
    Completed,
    Pending,
    Cancelled,
}

impl OrderStatus {
    /// Color the status cell is drawn in.
    pub fn tone(self) -> &'static str {
        match self {
            OrderStatus::Completed => "green",
            OrderStatus::Pending => "yellow",
            OrderStatus::Cancelled => "red",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRow {
    pub id: &'static str,
    pub customer: &'static str,
    pub date: &'static str,
    pub amount: &'static str,
    pub status: OrderStatus,
    pub tone: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuItem {
    pub label: &'static str,
    pub icon: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboardView {
    pub title: &'static str,
    pub sidebar_title: &'static str,
    pub menu: Vec<MenuItem>,
    pub actions: [&'static str; 2],
    pub stats: Vec<StatTile>,
    pub recent_orders: Vec<OrderRow>,
}

const STATS: [(&str, &str, &str, Accent); 4] = [
    ("Total Users", "1,504", "users", Accent::Purple),
    ("Total Revenue", "$12,750", "dollar-sign", Accent::Blue),
    ("Total Orders", "324", "shopping-bag", Accent::Teal),
    ("Conversion Rate", "85%", "chart-line", Accent::Orange),
];

const ORDERS: [(&str, &str, &str, &str, OrderStatus); 5] = [
    ("#ORD-001", "John Smith", "15 Mar 2025", "$125.00", OrderStatus::Completed),
    ("#ORD-002", "Emma Johnson", "14 Mar 2025", "$245.99", OrderStatus::Pending),
    ("#ORD-003", "Michael Brown", "13 Mar 2025", "$78.50", OrderStatus::Completed),
    ("#ORD-004", "Sarah Davis", "12 Mar 2025", "$350.00", OrderStatus::Cancelled),
    ("#ORD-005", "David Wilson", "11 Mar 2025", "$185.25", OrderStatus::Completed),
];

const MENU: [(&str, &str); 6] = [
    ("Dashboard", "home"),
    ("Users", "user"),
    ("Products", "box"),
    ("Orders", "shopping-cart"),
    ("Analytics", "chart-pie"),
    ("Settings", "cog"),
];

pub fn admin_dashboard() -> AdminDashboardView {
    AdminDashboardView {
        title: "Dashboard",
        sidebar_title: "Admin Panel",
        menu: MENU
            .iter()
            .map(|&(label, icon)| MenuItem { label, icon })
            .collect(),
        actions: ["Export", "+ Add New"],
        stats: STATS
            .iter()
            .map(|&(label, value, icon, accent)| StatTile {
                label,
                value,
                icon,
                accent,
            })
            .collect(),
        recent_orders: ORDERS
            .iter()
            .map(|&(id, customer, date, amount, status)| OrderRow {
                id,
                customer,
                date,
                amount,
                status,
                tone: status.tone(),
            })
            .collect(),
    }
}
