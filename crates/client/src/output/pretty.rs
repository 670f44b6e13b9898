//! Pretty output formatting.

use chrono::NaiveDate;
use planhaus_core::auth::SessionUser;
use planhaus_core::budget::{BudgetItem, BudgetSummary};
use planhaus_core::format::format_currency;
use planhaus_core::guests::{Guest, GuestStats};
use planhaus_core::projects::{DashboardStats, Project};
use planhaus_core::tasks::{Task, TimelineStats};
use planhaus_core::vendors::Vendor;

fn header(title: &str, count: usize) -> String {
    let mut output = format!("{} ({})\n", title, count);
    output.push_str(&"-".repeat(40));
    output
}

/// Format the signed-in user for display.
pub fn format_user(user: &SessionUser) -> String {
    let mut output = user
        .display_name()
        .map(str::to_string)
        .unwrap_or_else(|| "Signed in".to_string());
    output.push_str(&format!("\n  ID: {}", user.id_string()));
    if !user.has_completed_intake {
        output.push_str("\n  Intake: not completed");
    }
    output
}

/// Format a project for display.
pub fn format_project(project: &Project) -> String {
    let mut output = format!("{}\n  ID: {}", project.name, project.id);
    if let Some(date) = project.wedding_date {
        output.push_str(&format!("\n  Wedding: {}", date));
    }
    if project.total_budget.is_some() {
        output.push_str(&format!("\n  Budget: {}", format_currency(project.total_budget)));
    }
    if let Some(location) = &project.location {
        output.push_str(&format!("\n  Location: {}", location));
    }
    output
}

/// Format projects for display.
pub fn format_projects(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "No projects found.".to_string();
    }
    let mut output = header("PROJECTS", projects.len());
    for project in projects {
        output.push_str(&format!("\n{}", format_project(project)));
        output.push('\n');
    }
    output
}

/// Format a budget item as one line.
pub fn format_budget_item(item: &BudgetItem) -> String {
    let mut output = format!(
        "{} [{}] est. {}",
        item.description,
        item.category,
        format_currency(item.estimated_cost)
    );
    if item.actual_cost.is_some() {
        output.push_str(&format!(", actual {}", format_currency(item.actual_cost)));
    }
    if item.is_paid {
        output.push_str(" (paid)");
    }
    output.push_str(&format!("\n  ID: {}", item.id));
    output
}

/// Format budget items for display.
pub fn format_budget_items(items: &[&BudgetItem]) -> String {
    if items.is_empty() {
        return "No budget items found.".to_string();
    }
    let mut output = header("BUDGET ITEMS", items.len());
    for item in items {
        output.push_str(&format!("\n{}", format_budget_item(item)));
        output.push('\n');
    }
    output
}

/// Format the budget summary with one line per category.
pub fn format_budget_summary(summary: &BudgetSummary) -> String {
    let mut output = format!(
        "BUDGET\n  Total: {}\n  Spent: {} ({:.0}%)\n  Remaining: {}",
        format_currency(summary.total_budget),
        format_currency(summary.total_spent),
        summary.percent_spent,
        format_currency(summary.remaining),
    );
    if !summary.categories.is_empty() {
        output.push_str("\nCATEGORIES");
        for category in &summary.categories {
            output.push_str(&format!(
                "\n  {}: {} of {} ({:.0}%){}",
                category.name,
                format_currency(category.spent),
                format_currency(category.allocated),
                category.percent_spent,
                if category.over_budget { " over budget" } else { "" },
            ));
        }
    }
    if summary.uncategorized > 0 {
        output.push_str(&format!("\n  Uncategorized items: {}", summary.uncategorized));
    }
    output
}

/// Format a vendor for display.
pub fn format_vendor(vendor: &Vendor) -> String {
    let status = if vendor.booked() {
        "booked".to_string()
    } else {
        vendor.status.to_string()
    };
    let mut output = format!(
        "{} [{}] {}\n  ID: {}",
        vendor.name, vendor.category, status, vendor.id
    );
    if let Some(contact) = &vendor.contact_name {
        output.push_str(&format!("\n  Contact: {}", contact));
    }
    if let Some(email) = &vendor.email {
        output.push_str(&format!("\n  Email: {}", email));
    }
    if vendor.cost.is_some() {
        output.push_str(&format!("\n  Cost: {}", format_currency(vendor.cost)));
    }
    output
}

/// Format vendors for display.
pub fn format_vendors(vendors: &[Vendor]) -> String {
    if vendors.is_empty() {
        return "No vendors found.".to_string();
    }
    let mut output = header("VENDORS", vendors.len());
    for vendor in vendors {
        output.push_str(&format!("\n{}", format_vendor(vendor)));
        output.push('\n');
    }
    output
}

/// Format a guest as one line.
pub fn format_guest(guest: &Guest) -> String {
    let mut output = format!("{} ({})", guest.name, guest.rsvp_status);
    if guest.plus_one {
        output.push_str(" +1");
    }
    if let Some(table) = guest.table_number {
        output.push_str(&format!(" table {}", table));
    }
    output.push_str(&format!("\n  ID: {}", guest.id));
    output
}

/// Format guests with their RSVP counts.
pub fn format_guests(guests: &[&Guest], stats: &GuestStats) -> String {
    let mut output = format!(
        "RSVP: {} attending, {} declined, {} maybe, {} pending ({:.0}% responded, headcount {})",
        stats.attending,
        stats.declined,
        stats.maybe,
        stats.pending,
        stats.response_rate,
        stats.headcount
    );
    if guests.is_empty() {
        output.push_str("\nNo guests found.");
        return output;
    }
    output.push('\n');
    output.push_str(&header("GUESTS", guests.len()));
    for guest in guests {
        output.push_str(&format!("\n{}", format_guest(guest)));
        output.push('\n');
    }
    output
}

/// Format a task as one line.
pub fn format_task(task: &Task, today: NaiveDate) -> String {
    let check = if task.completed { "[x]" } else { "[ ]" };
    let mut output = format!("{} {}", check, task.title);
    if let Some(due) = task.due_date {
        output.push_str(&format!(" (due {})", due));
    }
    if task.is_overdue(today) {
        output.push_str(" OVERDUE");
    }
    output.push_str(&format!("\n  ID: {}", task.id));
    output
}

/// Format tasks for display.
pub fn format_tasks(tasks: &[Task], today: NaiveDate) -> String {
    if tasks.is_empty() {
        return "No tasks found.".to_string();
    }
    let mut output = header("TASKS", tasks.len());
    for task in tasks {
        output.push_str(&format!("\n{}", format_task(task, today)));
        output.push('\n');
    }
    output
}

pub fn format_timeline_stats(stats: &TimelineStats) -> String {
    format!(
        "TIMELINE\n  Completed: {} of {} ({:.0}%)\n  Overdue: {}\n  Due soon: {}",
        stats.completed, stats.total, stats.percent_complete, stats.overdue, stats.due_soon
    )
}

/// Format dashboard figures for display.
pub fn format_dashboard(stats: &DashboardStats) -> String {
    let mut output = format!(
        "DASHBOARD\n  Budget: {} spent of {}\n  Guests: {} confirmed of {}\n  Tasks: {} done of {}\n  Vendors: {} booked of {}",
        format_currency(stats.total_spent),
        format_currency(stats.total_budget),
        stats.confirmed_guests,
        stats.total_guests,
        stats.completed_tasks,
        stats.total_tasks,
        stats.booked_vendors,
        stats.total_vendors,
    );
    match stats.days_until_wedding {
        Some(days) if days >= 0 => output.push_str(&format!("\n  Days until wedding: {}", days)),
        Some(_) => output.push_str("\n  The wedding has passed"),
        None => {}
    }
    output
}
