//! Per-line settings and transfer times.

use tracing::{debug, warn};

use super::store::TimetableStore;
use crate::domain::{LineKind, LineSlot, RouteDirection, TransferSlot};
use crate::keys;
use crate::store::{KeyValueStore, StoreError, WriteBatch};

/// Most extra lines a route can chain after its first.
pub const MAX_EXTRA_LINES: u8 = 2;

/// The settings of one line on a route.
///
/// Unset text fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineConfig {
    pub operator_name: String,
    pub line_name: String,
    /// Display color as hex `RRGGBB`.
    pub color: String,
    pub code: String,
    pub kind: LineKind,
    /// Default ride time in minutes.
    pub ride_minutes: u32,
    /// Label of the endpoint nearer home.
    pub home_label: String,
    /// Label of the far endpoint.
    pub away_label: String,
}

impl LineConfig {
    /// Where the line is boarded on `route`.
    pub fn departure_point(&self, route: RouteDirection) -> &str {
        if route.is_return() {
            &self.away_label
        } else {
            &self.home_label
        }
    }

    /// Where the line is left on `route`.
    pub fn destination(&self, route: RouteDirection) -> &str {
        if route.is_return() {
            &self.home_label
        } else {
            &self.away_label
        }
    }
}

impl<S: KeyValueStore> TimetableStore<S> {
    fn text(&self, key: &str) -> String {
        self.store().get_string(key).unwrap_or_default()
    }

    pub fn load_line(&self, route: RouteDirection, line: LineSlot) -> LineConfig {
        LineConfig {
            operator_name: self.text(&keys::operator_name(route, line)),
            line_name: self.text(&keys::line_name(route, line)),
            color: self.text(&keys::line_color(route, line)),
            code: self.text(&keys::line_code(route, line)),
            kind: self.line_kind(route, line),
            ride_minutes: self.default_ride_time(route, line),
            home_label: self.text(&keys::home_label(route, line)),
            away_label: self.text(&keys::away_label(route, line)),
        }
    }

    /// Save every field of a line in one batch. Empty text removes its key.
    pub fn save_line(
        &mut self,
        route: RouteDirection,
        line: LineSlot,
        config: &LineConfig,
    ) -> Result<(), StoreError> {
        let mut batch = WriteBatch::new();
        batch
            .set_or_remove(keys::operator_name(route, line), &config.operator_name)
            .set_or_remove(keys::line_name(route, line), &config.line_name)
            .set_or_remove(keys::line_color(route, line), &config.color)
            .set_or_remove(keys::line_code(route, line), &config.code)
            .set_string(keys::line_kind(route, line), config.kind.as_str())
            .set_int(keys::ride_time(route, line), i64::from(config.ride_minutes))
            .set_or_remove(keys::home_label(route, line), &config.home_label)
            .set_or_remove(keys::away_label(route, line), &config.away_label);
        self.store_mut().apply(batch)?;
        debug!(%route, %line, name = %config.line_name, "saved line");
        Ok(())
    }

    /// Minutes allowed for a transfer. Unset is 0.
    pub fn transfer_minutes(&self, route: RouteDirection, slot: TransferSlot) -> u32 {
        let key = keys::transfer(route, slot);
        match self.store().get_int(&key) {
            Some(minutes) => u32::try_from(minutes).unwrap_or_else(|_| {
                warn!(key = %key, minutes, "invalid transfer time, using 0");
                0
            }),
            None => 0,
        }
    }

    pub fn set_transfer_minutes(
        &mut self,
        route: RouteDirection,
        slot: TransferSlot,
        minutes: u32,
    ) -> Result<(), StoreError> {
        self.store_mut()
            .set_int(&keys::transfer(route, slot), i64::from(minutes))
    }

    /// How many lines follow the first on a route, 0-2.
    pub fn line_count(&self, route: RouteDirection) -> u8 {
        let Some(count) = self.store().get_int(&keys::line_count(route)) else {
            return 0;
        };
        match u8::try_from(count) {
            Ok(c) if c <= MAX_EXTRA_LINES => c,
            _ => {
                warn!(%route, count, "line count out of range, clamping");
                count.clamp(0, i64::from(MAX_EXTRA_LINES)) as u8
            }
        }
    }

    /// Set the extra line count, clamped to 0-2.
    pub fn set_line_count(&mut self, route: RouteDirection, count: u8) -> Result<(), StoreError> {
        let clamped = count.min(MAX_EXTRA_LINES);
        if clamped != count {
            debug!(%route, count, "clamping line count");
        }
        self.store_mut()
            .set_int(&keys::line_count(route), i64::from(clamped))
    }

    /// The lines in use on a route, first line included.
    pub fn active_lines(&self, route: RouteDirection) -> impl Iterator<Item = LineSlot> + use<S> {
        let count = usize::from(self.line_count(route)) + 1;
        LineSlot::ALL.into_iter().take(count)
    }
}
