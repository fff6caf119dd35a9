use colored::{ColoredString, Colorize};

use crate::{
    admin::{BookingDetails, DashboardStats},
    booking::BookingSummary,
    gallery::{FileOutcome, GalleryReport},
    models::{BookingRecord, BookingStatus, RoomDetails},
    notification::{Notification, NotificationKind},
    settings::AppSettings,
    storage::StoredItem,
};

pub fn notification(note: &Notification) {
    let marker = match note.kind {
        NotificationKind::Success => "✓".bold().green(),
        NotificationKind::Error => "✗".bold().red(),
        NotificationKind::Info => "i".bold().blue(),
    };
    match &note.title {
        Some(title) => println!("{marker} {}\n  {}", title.bold(), note.message),
        None => println!("{marker} {}", note.message),
    }
}

pub fn error(message: &str) {
    eprintln!("{} {message}", "✗".bold().red());
}

fn status_badge(status: &BookingStatus) -> ColoredString {
    let label = status.label();
    match status {
        BookingStatus::Pending => label.yellow(),
        BookingStatus::Confirmed => label.green(),
        BookingStatus::Cancelled => label.red(),
        BookingStatus::Other(_) => label.normal(),
    }
}

pub fn bookings_table(bookings: &[BookingRecord], filtered: bool) {
    if bookings.is_empty() {
        let message = if filtered {
            "No bookings match these filters"
        } else {
            "No bookings found"
        };
        println!("{}", message.dimmed());
        return;
    }

    println!(
        "{:<18} {:<22} {:<34} {:<11} {:<11} {:>6}  {}",
        "ID".bold(),
        "Guest".bold(),
        "Room".bold(),
        "Check-in".bold(),
        "Check-out".bold(),
        "Guests".bold(),
        "Status".bold()
    );
    for booking in bookings {
        println!(
            "{:<18} {:<22} {:<34} {:<11} {:<11} {:>6}  {}",
            booking.id,
            truncate(&booking.name, 22),
            truncate(&booking.room_type, 34),
            booking.checkin,
            booking.checkout,
            booking.guests,
            status_badge(&booking.status)
        );
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let mut cut: String = value.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

pub fn booking_details(details: &BookingDetails) {
    let width = details
        .rows
        .iter()
        .map(|(label, _)| label.len())
        .max()
        .unwrap_or(0);
    for (label, value) in &details.rows {
        println!("{:>width$}: {value}", label.bold());
    }
}

pub fn stats(stats: &DashboardStats) {
    println!("{} {}", "Bookings:".bold(), stats.bookings_count);
    println!("{} {}%", "Occupancy:".bold(), stats.occupancy_rate);
}

pub fn summary(summary: &BookingSummary) {
    println!("{}", "Booking Summary".bold());
    println!("  Room:      {}", summary.room_type);
    println!("  Guests:    {}", summary.guests_label());
    println!("  Check-in:  {}", summary.checkin);
    println!("  Check-out: {}", summary.checkout);
    println!("  Duration:  {}", summary.nights_label());
    println!("  Total:     {}", summary.total_label().bold().green());
}

pub fn room_details(name: &str, details: &RoomDetails) {
    println!("{}", name.bold());
    println!("  Price:       ₹{}", details.price);
    println!("  Capacity:    {}", details.capacity);
    println!("  Status:      {}", details.status.as_str());
    println!("  Description: {}", details.description);
    let amenities: Vec<_> = details.amenities.iter().map(|a| a.as_str()).collect();
    println!("  Amenities:   {}", amenities.join(", "));
    if let Some(updated) = &details.last_updated {
        println!("  Updated:     {}", updated.dimmed());
    }
}

pub fn storage_items(items: &[StoredItem]) {
    if items.is_empty() {
        println!("{}", "Storage is empty".dimmed());
        return;
    }
    for item in items {
        println!(
            "{:<32} {:>8} B  {}",
            item.key,
            item.size_bytes,
            item.updated_at.to_rfc3339().dimmed()
        );
    }
}

pub fn settings(settings: &AppSettings) -> Result<(), String> {
    let json = serde_json::to_string_pretty(settings).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}

pub fn gallery(report: &GalleryReport) {
    for (name, outcome) in &report.files {
        match outcome {
            FileOutcome::Converted => {
                println!("{} {name} converted successfully", "✓".green())
            }
            FileOutcome::Failed(reason) => {
                println!("{} Failed to convert {name}: {reason}", "✗".red())
            }
        }
    }
    println!(
        "\nBase64 conversion completed ({} of {} images)! Check {}",
        report.converted(),
        report.files.len(),
        report.text_path.display()
    );
    println!(
        "Gallery HTML snippet created: {}",
        report.snippet_path.display()
    );
}
