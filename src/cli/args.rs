use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::{
    booking::BookingForm,
    models::{Amenity, RoomAvailability},
};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "shree-lodge",
    version,
    about = "Booking desk for Shree Agrawal Yaatri Grah & Lodge",
    long_about = "Take room bookings, hand them to WhatsApp and manage them from the owner's dashboard.\n\nExamples:\n  shree-lodge book --name \"Ravi Kumar\" --phone 9876543210 --email ravi@example.com \\\n      --checkin 2025-01-10 --checkout 2025-01-12 --room ac-deluxe --guests 2\n  shree-lodge admin login -u kartik -p kartik123\n  shree-lodge admin list --status confirmed\n  shree-lodge gallery --images shree_public/images"
)]
pub struct CliArgs {
    #[arg(
        long,
        value_name = "DIR",
        global = true,
        help_heading = "Storage",
        help = "Directory holding settings.json and profile databases."
    )]
    pub data_dir: Option<PathBuf>,

    #[arg(
        long,
        value_name = "NAME",
        global = true,
        help_heading = "Storage",
        help = "Storage profile to use (one database per profile)."
    )]
    pub profile: Option<String>,

    #[arg(
        long,
        global = true,
        help_heading = "Storage",
        help = "Keep everything in memory; nothing survives the command."
    )]
    pub ephemeral: bool,

    #[arg(
        long,
        global = true,
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true,
        help_heading = "Output",
        help = "Increase log verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Submit a booking request and open the WhatsApp chat.
    Book(BookArgs),
    /// Show the price summary for a stay without booking.
    Quote(QuoteArgs),
    /// Owner dashboard.
    #[command(subcommand)]
    Admin(AdminCommand),
    /// Per-room details shown on the dashboard.
    #[command(subcommand)]
    Room(RoomCommand),
    /// Inspect the raw key/value store.
    #[command(subcommand)]
    Storage(StorageCommand),
    #[command(subcommand)]
    Settings(SettingsCommand),
    /// Encode gallery photos as inline base64 images.
    Gallery(GalleryArgs),
}

#[derive(Args, Debug, Clone)]
pub struct BookArgs {
    #[arg(long, default_value = "")]
    pub name: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long, default_value = "")]
    pub email: String,
    #[arg(long, value_name = "YYYY-MM-DD", default_value = "")]
    pub checkin: String,
    #[arg(long, value_name = "YYYY-MM-DD", default_value = "")]
    pub checkout: String,
    #[arg(long, value_name = "ROOM", default_value = "", help = "ac-deluxe, ac-premium, non-ac-standard or non-ac-economy")]
    pub room: String,
    #[arg(long, default_value = "")]
    pub guests: String,
    #[arg(long, default_value = "", help = "Special requests.")]
    pub message: String,
    #[arg(long, help = "Print the WhatsApp link instead of opening it.")]
    pub no_open: bool,
}

impl BookArgs {
    pub fn form(&self) -> BookingForm {
        BookingForm {
            name: self.name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            checkin: self.checkin.clone(),
            checkout: self.checkout.clone(),
            roomtype: self.room.clone(),
            guests: self.guests.clone(),
            message: self.message.clone(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct QuoteArgs {
    #[arg(long)]
    pub room: String,
    #[arg(long)]
    pub guests: String,
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub checkin: String,
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub checkout: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum AdminCommand {
    Login {
        #[arg(short, long, default_value = "")]
        username: String,
        #[arg(short, long, default_value = "")]
        password: String,
    },
    Logout,
    /// Whether the dashboard is unlocked.
    Status,
    /// Bookings table, newest first.
    List {
        #[arg(long, default_value = "all", help = "all, pending, confirmed or cancelled")]
        status: String,
        #[arg(long, value_name = "YYYY-MM-DD", help = "Earliest check-in date.")]
        from: Option<String>,
        #[arg(long, value_name = "YYYY-MM-DD", help = "Latest check-in date.")]
        to: Option<String>,
        #[arg(long, help = "Print the records as JSON.")]
        json: bool,
    },
    View {
        id: String,
    },
    Delete {
        id: String,
        #[arg(short, long, help = "Skip the confirmation prompt.")]
        yes: bool,
    },
    Stats,
    /// Write all bookings to bookings_<date>.csv.
    Export {
        #[arg(long, value_name = "DIR", default_value = ".")]
        out: PathBuf,
    },
    /// Add the demo booking if it is missing.
    Sample,
    /// Poll for new bookings until interrupted.
    Watch,
}

#[derive(Subcommand, Debug, Clone)]
pub enum RoomCommand {
    Show {
        #[arg(help = "Room slug or display name.")]
        room: String,
    },
    Edit(RoomEditArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RoomEditArgs {
    #[arg(help = "Room slug or display name.")]
    pub room: String,
    #[arg(long, default_value = "")]
    pub price: String,
    #[arg(long, default_value = "2")]
    pub capacity: String,
    #[arg(long, value_enum, default_value_t = RoomAvailability::Available)]
    pub status: RoomAvailability,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long = "amenity", value_enum, action = ArgAction::Append)]
    pub amenities: Vec<Amenity>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum StorageCommand {
    /// Stored keys with their sizes.
    Keys,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SettingsCommand {
    Show,
    Set(SettingsSetArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SettingsSetArgs {
    #[arg(long, value_name = "NUMBER")]
    pub whatsapp: Option<String>,
    #[arg(long)]
    pub max_bookings: Option<usize>,
    #[arg(long, value_name = "SECS")]
    pub refresh_secs: Option<u64>,
    #[arg(long, value_name = "MS")]
    pub open_delay_ms: Option<u64>,
    #[arg(long, value_name = "MS")]
    pub reset_delay_ms: Option<u64>,
    #[arg(long)]
    pub admin_username: Option<String>,
    #[arg(long)]
    pub admin_password: Option<String>,
    #[arg(long, value_name = "NAME")]
    pub default_profile: Option<String>,
    #[arg(long, value_name = "DIR")]
    pub images_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct GalleryArgs {
    #[arg(long, value_name = "DIR", help = "Defaults to the images_dir setting.")]
    pub images: Option<PathBuf>,
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub out: PathBuf,
}
