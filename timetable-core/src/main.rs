use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use timetable_core::calendar::{Calendar, HolidaySet, canonicalize, resolve_for_date};
use timetable_core::config::Config;
use timetable_core::domain::{
    END_OF_SERVICE, Hour, LineKind, LineSlot, RouteDirection, TimetableEntry, format_hhmm,
};
use timetable_core::keys::{BucketAddress, CopySource};
use timetable_core::store::{CachedStore, JsonFileStore};
use timetable_core::timetable::TimetableStore;
use timetable_core::train_type::classify;

type Store = TimetableStore<CachedStore<JsonFileStore>>;

/// Edit and query hand-authored timetables.
#[derive(Parser)]
#[command(version)]
struct Cli {
    /// Store file; overrides TIMETABLE_STORE_PATH
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Holiday file; overrides TIMETABLE_HOLIDAYS_PATH
    #[arg(long, global = true)]
    holidays: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Which timetable to work on.
#[derive(Args)]
struct Target {
    /// Route direction: go1, go2, back1 or back2
    #[arg(long, default_value = "go1")]
    route: RouteDirection,

    /// Line slot, 0-2
    #[arg(long, default_value_t = 0)]
    line: u8,

    /// Calendar identifier, e.g. weekday or odpt.Calendar:SaturdayHoliday
    #[arg(long, default_value = "weekday")]
    calendar: String,
}

impl Target {
    fn line(&self) -> Result<LineSlot> {
        Ok(LineSlot::new(self.line)?)
    }

    fn calendar(&self) -> Calendar {
        canonicalize(&self.calendar)
    }

    fn at(&self, hour: u32) -> Result<BucketAddress> {
        Ok(BucketAddress::new(
            self.route,
            self.line()?,
            self.calendar(),
            Hour::new(hour)?,
        ))
    }
}

#[derive(Subcommand)]
enum Command {
    /// Show departures for one hour, or the whole day
    List {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        hour: Option<u32>,
    },
    /// Add or replace a departure
    Add {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        hour: u32,
        #[arg(long)]
        minute: u32,
        /// Ride time in minutes; defaults to the line's
        #[arg(long)]
        ride: Option<u32>,
        /// A single word, e.g. Rapid; empty means none
        #[arg(long)]
        train_type: Option<String>,
    },
    /// Delete a departure
    Delete {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        hour: u32,
        #[arg(long)]
        minute: u32,
    },
    /// Show the span of hours with departures
    Range {
        #[command(flatten)]
        target: Target,
    },
    /// Copy departure times into an hour from one of six sources
    Copy {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        hour: u32,
        /// 0 previous hour, 1 next hour, 2 opposite calendar, 3-5 opposite route line 1-3
        #[arg(long)]
        source: usize,
    },
    /// Show the train types used by a calendar
    Types {
        #[command(flatten)]
        target: Target,
        /// Store the list if it is missing
        #[arg(long)]
        rebuild: bool,
    },
    /// Show the next departure and a countdown to it
    Next {
        #[command(flatten)]
        target: Target,
        /// Current time as HH:MM:SS; defaults to now
        #[arg(long)]
        at: Option<NaiveTime>,
    },
    /// Pick the calendar that applies on a date
    Resolve {
        /// YYYY-MM-DD; defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Calendars with timetables, comma separated
        #[arg(long, value_delimiter = ',', default_value = "weekday,weekend")]
        available: Vec<String>,
    },
    /// Show a line's settings, updating any given
    Line {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        operator: Option<String>,
        /// Hex RRGGBB
        #[arg(long)]
        color: Option<String>,
        /// rail or bus
        #[arg(long)]
        kind: Option<String>,
        /// Default ride time in minutes
        #[arg(long)]
        ride: Option<u32>,
        /// Home-side endpoint
        #[arg(long)]
        home: Option<String>,
        /// Away-side endpoint
        #[arg(long)]
        away: Option<String>,
    },
    /// Classify a train type identifier
    Classify { train_type: String },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn open_store(config: &Config) -> Result<Store> {
    let file = JsonFileStore::open(&config.store_path)
        .with_context(|| format!("opening store {}", config.store_path.display()))?;
    Ok(TimetableStore::new(CachedStore::new(file, &config.cache)))
}

fn load_holidays(config: &Config) -> Result<HolidaySet> {
    match &config.holidays_path {
        Some(path) => HolidaySet::load(path)
            .with_context(|| format!("loading holidays from {}", path.display())),
        None => Ok(HolidaySet::default()),
    }
}

fn print_entry(hour: Hour, entry: &TimetableEntry) {
    println!(
        "{}  ride {:>3}m  arr {}  {}",
        format_hhmm(entry.departure_hhmm(hour)),
        entry.ride_minutes,
        format_hhmm(entry.arrival_hhmm(hour)),
        entry.train_type.as_deref().unwrap_or("")
    );
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(path) = cli.store {
        config.store_path = path;
    }
    if let Some(path) = cli.holidays {
        config.holidays_path = Some(path);
    }
    debug!(?config, "loaded configuration");

    match cli.command {
        Command::List { target, hour } => {
            let store = open_store(&config)?;
            match hour {
                Some(hour) => {
                    let addr = target.at(hour)?;
                    for entry in store.load_entries(&addr) {
                        print_entry(addr.hour, &entry);
                    }
                }
                None => {
                    let day = store.load_day(target.route, target.line()?, &target.calendar());
                    for (hour, bucket) in day {
                        if bucket.is_empty() {
                            println!("{hour}:  -");
                        }
                        for entry in bucket.entries() {
                            print_entry(hour, entry);
                        }
                    }
                }
            }
        }
        Command::Add {
            target,
            hour,
            minute,
            ride,
            train_type,
        } => {
            let mut store = open_store(&config)?;
            let addr = target.at(hour)?;
            let ride = ride.unwrap_or_else(|| store.default_ride_time(addr.route, addr.line));
            let entry = TimetableEntry::new(minute, ride, train_type)?;
            store.upsert_entry(&addr, entry)?;
        }
        Command::Delete {
            target,
            hour,
            minute,
        } => {
            let mut store = open_store(&config)?;
            if !store.delete_entry(&target.at(hour)?, minute)? {
                println!("no departure at {hour}:{minute:02}");
            }
        }
        Command::Range { target } => {
            let store = open_store(&config)?;
            match store.valid_hour_range(target.route, target.line()?, &target.calendar()) {
                Some(range) => println!("{}-{}", range.first, range.last),
                None => println!("no departures"),
            }
        }
        Command::Copy {
            target,
            hour,
            source,
        } => {
            let mut store = open_store(&config)?;
            let source = CopySource::from_index(source)?;
            if !store.copy_into(&target.at(hour)?, source)? {
                println!("hour {hour} has no {source:?} source");
            }
        }
        Command::Types { target, rebuild } => {
            let mut store = open_store(&config)?;
            let (route, line, calendar) = (target.route, target.line()?, target.calendar());
            let types = if rebuild {
                store.rebuild_train_type_cache(route, line, &calendar)?
            } else {
                store.train_types(route, line, &calendar)
            };
            for raw in types {
                let bucket = classify(&raw);
                println!("{raw}  {bucket}  #{}", bucket.color().hex());
            }
        }
        Command::Next { target, at } => {
            let store = open_store(&config)?;
            let now = at.unwrap_or_else(|| Local::now().time());
            match store.countdown_to(target.route, target.line()?, &target.calendar(), now) {
                Some((next, countdown)) => println!(
                    "{} (in {}, {:?})",
                    format_hhmm(next.departure_hhmm()),
                    countdown,
                    countdown.tier
                ),
                None => println!("{}", format_hhmm(END_OF_SERVICE)),
            }
        }
        Command::Resolve { date, available } => {
            let holidays = load_holidays(&config)?;
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let available: Vec<Calendar> = available.iter().map(|raw| canonicalize(raw)).collect();
            let calendar = resolve_for_date(date, &available, &holidays);
            println!("{calendar}  {}", calendar.odpt_id());
        }
        Command::Line {
            target,
            name,
            operator,
            color,
            kind,
            ride,
            home,
            away,
        } => {
            let mut store = open_store(&config)?;
            let (route, line) = (target.route, target.line()?);
            let mut settings = store.load_line(route, line);
            let before = settings.clone();
            if let Some(name) = name {
                settings.line_name = name;
            }
            if let Some(operator) = operator {
                settings.operator_name = operator;
            }
            if let Some(color) = color {
                settings.color = color;
            }
            if let Some(kind) = kind {
                settings.kind = LineKind::parse(&kind)?;
            }
            if let Some(ride) = ride {
                settings.ride_minutes = ride;
            }
            if let Some(home) = home {
                settings.home_label = home;
            }
            if let Some(away) = away {
                settings.away_label = away;
            }
            if settings != before {
                store.save_line(route, line, &settings)?;
            }
            println!(
                "{} {} ({}, {}) {} -> {}, {}m",
                settings.operator_name,
                settings.line_name,
                settings.kind,
                settings.color,
                settings.departure_point(route),
                settings.destination(route),
                settings.ride_minutes
            );
        }
        Command::Classify { train_type } => {
            let bucket = classify(&train_type);
            println!(
                "{bucket}  #{}  priority {}",
                bucket.color().hex(),
                bucket.priority()
            );
        }
    }

    Ok(())
}
