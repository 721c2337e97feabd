use anyhow::Result;
use serde::Serialize;

use daily_specials_admin::{ActiveSpecials, DailySpecial, DashboardStats, Paginated};

pub struct Printer {
    json: bool,
}

impl Printer {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    fn print_json<T: Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    pub fn special(&self, special: &DailySpecial) -> Result<()> {
        if self.json {
            return self.print_json(special);
        }
        println!("{:<10} {}", "ID", special.id);
        println!("{:<10} {}", "Name", special.name);
        println!("{:<10} {}", "Price", special.price);
        println!("{:<10} {}", "Status", status_label(special.is_active));
        if !special.description.is_empty() {
            println!("{:<10} {}", "About", special.description);
        }
        if let Some(image) = &special.image {
            println!("{:<10} {}", "Image", image);
        }
        println!("{:<10} {}", "Created", special.created_at.format("%Y-%m-%d %H:%M"));
        println!("{:<10} {}", "Updated", special.updated_at.format("%Y-%m-%d %H:%M"));
        Ok(())
    }

    pub fn page(&self, page: &Paginated<DailySpecial>, number: u32) -> Result<()> {
        if self.json {
            return self.print_json(page);
        }
        table(&page.results);
        println!();
        println!(
            "Page {number}: {} of {} specials{}{}",
            page.results.len(),
            page.count,
            if page.previous.is_some() { ", has previous" } else { "" },
            if page.next.is_some() { ", has next" } else { "" },
        );
        Ok(())
    }

    pub fn active(&self, active: &ActiveSpecials) -> Result<()> {
        if self.json {
            return self.print_json(active);
        }
        table(&active.results);
        println!();
        println!("{} active specials", active.count);
        Ok(())
    }

    pub fn dashboard(&self, stats: &DashboardStats) -> Result<()> {
        if self.json {
            return self.print_json(stats);
        }
        println!("Total specials: {}", stats.total);
        println!("Active:         {}", stats.active);
        println!("Inactive:       {}", stats.inactive);
        println!();
        println!("Recent specials");
        table(&stats.recent);
        Ok(())
    }

    pub fn message(&self, message: &str) -> Result<()> {
        if self.json {
            return self.print_json(&serde_json::json!({ "status": "ok", "message": message }));
        }
        println!("{message}");
        Ok(())
    }
}

fn status_label(is_active: bool) -> &'static str {
    if is_active {
        "Active"
    } else {
        "Inactive"
    }
}

fn table(specials: &[DailySpecial]) {
    if specials.is_empty() {
        println!("No specials yet");
        return;
    }

    let name_width = specials
        .iter()
        .map(|s| s.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);

    println!(
        "{:>6}  {:<name_width$}  {:>10}  {:<8}  Created",
        "ID", "Name", "Price", "Status"
    );
    for special in specials {
        println!(
            "{:>6}  {:<name_width$}  {:>10}  {:<8}  {}",
            special.id,
            special.name,
            special.price,
            status_label(special.is_active),
            special.created_at.format("%Y-%m-%d %H:%M"),
        );
    }
}
