//! Command-line shell over [`crate::commands`].

pub mod args;
mod output;

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    sync::Arc,
};

use anyhow::{Context, Result};
use log::info;

use crate::{
    admin::{BookingFilter, RoomUpdate},
    booking::{LinkOpener, SystemOpener},
    commands::{self, room_name, AppState},
    settings::{resolve_data_dir, SettingsStore},
    storage::{LocalStorage, MemoryStorage, SqliteStorage},
};

pub use args::CliArgs;
use args::{AdminCommand, Command, RoomCommand, SettingsCommand, StorageCommand};

/// Prints the link instead of launching a browser.
struct PrintOpener;

impl LinkOpener for PrintOpener {
    fn open(&self, url: &str) -> Result<()> {
        println!("{url}");
        Ok(())
    }
}

pub async fn execute(args: CliArgs) -> Result<(), String> {
    if args.no_color {
        colored::control::set_override(false);
    }

    let data_dir = resolve_data_dir(args.data_dir.clone());
    let settings = SettingsStore::load(&data_dir).map_err(|e| format!("{e:#}"))?;
    let opener: Arc<dyn LinkOpener> = match &args.command {
        Command::Book(book) if book.no_open => Arc::new(PrintOpener),
        _ => Arc::new(SystemOpener),
    };

    if args.ephemeral {
        info!("Using in-memory storage");
        let state = AppState::new(MemoryStorage::new(), settings, opener);
        dispatch(&state, args.command).await
    } else {
        let profile = args
            .profile
            .clone()
            .unwrap_or_else(|| settings.current().profile);
        let storage = open_profile(&data_dir, &profile).map_err(|e| format!("{e:#}"))?;
        let state = AppState::new(storage, settings, opener);
        dispatch(&state, args.command).await
    }
}

fn open_profile(data_dir: &std::path::Path, profile: &str) -> Result<SqliteStorage> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create data dir {}", data_dir.display()))?;
    let storage = SqliteStorage::open(data_dir, profile)?;
    info!("Using profile '{profile}' in {}", data_dir.display());
    Ok(storage)
}

async fn dispatch<S: LocalStorage>(state: &AppState<S>, command: Command) -> Result<(), String> {
    match command {
        Command::Book(book) => {
            let form = book.form();
            if let Some(summary) = commands::quote_booking(&form) {
                output::summary(&summary);
            }
            match commands::submit_booking(state, form).await {
                Ok(outcome) => {
                    output::notification(&outcome.notification);
                    println!("Booking ID: {}", outcome.submission.record.id);
                    outcome
                        .pending
                        .open_link
                        .await
                        .map_err(|e| e.to_string())?;
                    // The form lives only as long as this process.
                    outcome.pending.reset_form.abort();
                    Ok(())
                }
                Err(note) => Err(match note.title {
                    Some(title) => format!("{title}: {}", note.message),
                    None => note.message,
                }),
            }
        }
        Command::Quote(quote) => {
            let form = crate::booking::BookingForm {
                roomtype: quote.room,
                guests: quote.guests,
                checkin: quote.checkin,
                checkout: quote.checkout,
                ..Default::default()
            };
            let summary = commands::quote_booking(&form)
                .ok_or_else(|| "Fill in room, guests and a stay of at least one night".to_string())?;
            output::summary(&summary);
            Ok(())
        }
        Command::Admin(admin) => dispatch_admin(state, admin).await,
        Command::Room(RoomCommand::Show { room }) => {
            let details = commands::get_room_details(state, room.clone()).await?;
            output::room_details(&room_name(&room), &details);
            Ok(())
        }
        Command::Room(RoomCommand::Edit(edit)) => {
            let update = RoomUpdate {
                price: edit.price,
                capacity: edit.capacity,
                status: edit.status,
                description: edit.description,
                amenities: edit.amenities,
            };
            let note = commands::save_room_details(state, edit.room, update).await?;
            output::notification(&note);
            Ok(())
        }
        Command::Storage(StorageCommand::Keys) => {
            output::storage_items(&commands::list_storage_items(state).await?);
            Ok(())
        }
        Command::Settings(SettingsCommand::Show) => output::settings(&commands::get_settings(state)),
        Command::Settings(SettingsCommand::Set(set)) => {
            let updated = commands::update_settings(state, |s| {
                if let Some(number) = set.whatsapp {
                    s.whatsapp_number = number;
                }
                if let Some(max) = set.max_bookings {
                    s.max_bookings = max;
                }
                if let Some(secs) = set.refresh_secs {
                    s.refresh_interval_secs = secs;
                }
                if let Some(ms) = set.open_delay_ms {
                    s.whatsapp_open_delay_ms = ms;
                }
                if let Some(ms) = set.reset_delay_ms {
                    s.form_reset_delay_ms = ms;
                }
                if let Some(username) = set.admin_username {
                    s.admin_username = username;
                }
                if let Some(password) = set.admin_password {
                    s.admin_password = password;
                }
                if let Some(profile) = set.default_profile {
                    s.profile = profile;
                }
                if let Some(dir) = set.images_dir {
                    s.images_dir = dir;
                }
            })?;
            output::settings(&updated)
        }
        Command::Gallery(gallery) => {
            let images: PathBuf = gallery
                .images
                .unwrap_or_else(|| commands::get_settings(state).images_dir);
            let report = commands::convert_gallery(&images, &gallery.out)?;
            output::gallery(&report);
            Ok(())
        }
    }
}

async fn dispatch_admin<S: LocalStorage>(
    state: &AppState<S>,
    command: AdminCommand,
) -> Result<(), String> {
    match command {
        AdminCommand::Login { username, password } => {
            let note = commands::admin_login(state, username, password).await?;
            output::notification(&note);
            Ok(())
        }
        AdminCommand::Logout => {
            commands::admin_logout(state).await?;
            println!("Logged out");
            Ok(())
        }
        AdminCommand::Status => {
            if commands::is_admin_logged_in(state).await? {
                println!("Logged in");
            } else {
                println!("Logged out");
            }
            Ok(())
        }
        AdminCommand::List {
            status,
            from,
            to,
            json,
        } => {
            let filter = BookingFilter {
                status: Some(status),
                checkin_from: from,
                checkin_to: to,
            };
            let filtered = !filter.is_empty();
            let bookings = commands::list_bookings(state, filter).await?;
            if json {
                let text = serde_json::to_string_pretty(&bookings).map_err(|e| e.to_string())?;
                println!("{text}");
            } else {
                output::bookings_table(&bookings, filtered);
            }
            Ok(())
        }
        AdminCommand::View { id } => {
            output::booking_details(&commands::view_booking(state, id).await?);
            Ok(())
        }
        AdminCommand::Delete { id, yes } => {
            if !yes && !confirm("Are you sure you want to delete this booking?")? {
                println!("Cancelled");
                return Ok(());
            }
            output::notification(&commands::delete_booking(state, id).await?);
            Ok(())
        }
        AdminCommand::Stats => {
            output::stats(&commands::get_stats(state).await?);
            Ok(())
        }
        AdminCommand::Export { out } => {
            let path = commands::export_bookings(state, &out).await?;
            println!("Exported to {}", path.display());
            Ok(())
        }
        AdminCommand::Sample => {
            output::notification(&commands::add_sample_booking(state).await?);
            Ok(())
        }
        AdminCommand::Watch => {
            let (mut watcher, mut events) = commands::watch_bookings(state).await?;
            println!("Watching for new bookings (Ctrl-C to stop)");
            loop {
                tokio::select! {
                    event = events.recv() => match event {
                        Some(event) => {
                            output::notification(&event.notification());
                            let fresh = event.new_bookings.min(event.bookings.len());
                            output::bookings_table(&event.bookings[..fresh], false);
                        }
                        None => break,
                    },
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
            watcher.stop().await.map_err(|e| e.to_string())
        }
    }
}

pub fn report_error(message: &str) {
    output::error(message);
}

fn confirm(prompt: &str) -> Result<bool, String> {
    print!("{prompt} [y/N] ");
    io::stdout().flush().map_err(|e| e.to_string())?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|e| e.to_string())?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
