mod debounce;
mod settings;

pub use settings::{
    Colors, ColumnKey, ColumnSettings, ColumnUpdate, Columns, Currency, CurrencyPosition,
    CurrencyUpdate, DateFormat, DateFormatSettings, FontKey, Fonts, HeaderStyle, LabelKey, Labels,
    Layout, LayoutKey, ReportSettingUpdate, ReportSettings, Settings, Styling, TableHeaders,
    ColorRole,
};

use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use chrono::NaiveDate;
use log::{error, warn};

use crate::storage::{Storage, COUNTER_KEY, SETTINGS_KEY};
use debounce::Debouncer;

/// Quiescence window for persisting rapid edits as one write.
pub const SAVE_DEBOUNCE: Duration = Duration::from_millis(300);

type Listener = Arc<dyn Fn(&Settings) + Send + Sync>;

struct Inner {
    state: Settings,
    storage: Arc<dyn Storage>,
    listeners: Vec<(u64, Listener)>,
    next_listener_id: u64,
    dirty: bool,
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(|e| e.into_inner())
}

/// Persist the current in-memory state and notify subscribers.
///
/// Listeners run outside the lock against a snapshot, so a listener may
/// freely call back into the store (including unsubscribing).
fn persist(inner: &Mutex<Inner>) {
    let (storage, snapshot, listeners) = {
        let mut guard = lock(inner);
        guard.dirty = false;
        let listeners: Vec<Listener> =
            guard.listeners.iter().map(|(_, l)| Arc::clone(l)).collect();
        (Arc::clone(&guard.storage), guard.state.clone(), listeners)
    };

    match serde_json::to_string(&snapshot) {
        Ok(raw) => {
            if let Err(e) = storage.put(SETTINGS_KEY, &raw) {
                // Durability is best-effort; in-memory state stays current.
                error!("failed to save customization settings: {e}");
            }
        }
        Err(e) => error!("failed to serialize customization settings: {e}"),
    }

    for listener in listeners {
        listener(&snapshot);
    }
}

/// Single source of truth for all user-visible customization state, and
/// the only writer of the persisted settings key.
///
/// Mutations update the in-memory tree synchronously and schedule a
/// debounced persist; `reset_to_defaults`, `import_settings` and `flush`
/// write through immediately.
pub struct Store {
    inner: Arc<Mutex<Inner>>,
    saver: Debouncer,
}

impl Store {
    /// Load persisted settings, merging them under the built-in defaults.
    /// Unreadable or malformed blobs fall back to the defaults.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let state = match storage.get(SETTINGS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(state) => state,
                Err(e) => {
                    warn!("failed to parse saved customization, using defaults: {e}");
                    Settings::default()
                }
            },
            Ok(None) => Settings::default(),
            Err(e) => {
                warn!("failed to load saved customization, using defaults: {e}");
                Settings::default()
            }
        };

        let inner = Arc::new(Mutex::new(Inner {
            state,
            storage,
            listeners: Vec::new(),
            next_listener_id: 0,
            dirty: false,
        }));

        let task_inner = Arc::clone(&inner);
        let saver = Debouncer::new(SAVE_DEBOUNCE, move || persist(&task_inner));

        Self { inner, saver }
    }

    /// Snapshot of the current in-memory settings. Always current, even
    /// while a debounced persist is still pending.
    pub fn state(&self) -> Settings {
        lock(&self.inner).state.clone()
    }

    fn mutate(&self, apply: impl FnOnce(&mut Settings)) {
        {
            let mut guard = lock(&self.inner);
            apply(&mut guard.state);
            guard.dirty = true;
        }
        self.saver.schedule();
    }

    pub fn update_table_header(&self, column: ColumnKey, text: impl Into<String>) {
        let text = text.into();
        self.mutate(|s| s.table_headers.set(column, text));
    }

    pub fn update_label(&self, key: LabelKey, text: impl Into<String>) {
        let text = text.into();
        self.mutate(|s| s.labels.set(key, text));
    }

    pub fn update_color(&self, role: ColorRole, value: impl Into<String>) {
        let value = value.into();
        self.mutate(|s| s.styling.colors.set(role, value));
    }

    pub fn update_font(&self, key: FontKey, value: impl Into<String>) {
        let value = value.into();
        self.mutate(|s| s.styling.fonts.set(key, value));
    }

    pub fn update_layout(&self, key: LayoutKey, value: impl Into<String>) {
        let value = value.into();
        self.mutate(|s| s.styling.layout.set(key, value));
    }

    pub fn update_currency(&self, update: CurrencyUpdate) {
        self.mutate(|s| s.currency.apply(update));
    }

    /// Set the date format; the display format follows it.
    pub fn update_date_format(&self, format: DateFormat) {
        self.mutate(|s| {
            s.date_format.format = format;
            s.date_format.display = format;
        });
    }

    pub fn update_report_setting(&self, update: ReportSettingUpdate) {
        self.mutate(|s| s.report_settings.apply(update));
    }

    pub fn update_column(&self, column: ColumnKey, update: ColumnUpdate) {
        self.mutate(|s| s.columns.get_mut(column).apply(update));
    }

    pub fn update_header_style(&self, style: HeaderStyle) {
        self.mutate(|s| s.header_style = style);
    }

    /// Replace the whole tree with the built-in defaults and persist
    /// immediately, bypassing the debouncer.
    pub fn reset_to_defaults(&self) {
        self.saver.cancel();
        lock(&self.inner).state = Settings::default();
        persist(&self.inner);
    }

    /// Persist any pending change now. No-op when nothing is dirty.
    pub fn flush(&self) {
        self.saver.cancel();
        if lock(&self.inner).dirty {
            persist(&self.inner);
        }
    }

    /// Register a listener invoked with the full new state after every
    /// persisted write.
    pub fn subscribe(&self, listener: impl Fn(&Settings) + Send + Sync + 'static) -> Subscription {
        let mut guard = lock(&self.inner);
        let id = guard.next_listener_id;
        guard.next_listener_id += 1;
        guard.listeners.push((id, Arc::new(listener)));
        Subscription {
            inner: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// Serialize the full settings tree as pretty JSON.
    pub fn export_settings(&self) -> String {
        serde_json::to_string_pretty(&lock(&self.inner).state).unwrap_or_else(|e| {
            error!("failed to serialize settings for export: {e}");
            String::new()
        })
    }

    /// Replace the settings tree from serialized JSON, merging missing
    /// fields from the defaults exactly like load-from-storage. Returns
    /// `false` (and leaves state untouched) if the input is unparsable.
    pub fn import_settings(&self, raw: &str) -> bool {
        match serde_json::from_str::<Settings>(raw) {
            Ok(imported) => {
                self.saver.cancel();
                lock(&self.inner).state = imported;
                persist(&self.inner);
                true
            }
            Err(e) => {
                error!("failed to import settings: {e}");
                false
            }
        }
    }

    /// Format an amount using the current currency settings.
    pub fn format_currency(&self, amount: f64) -> String {
        let currency = lock(&self.inner).state.currency.clone();
        format_currency(&currency, amount)
    }

    /// Format a `YYYY-MM-DD` date value using the current display format.
    /// Empty input yields an empty string; unparsable input is returned
    /// as-is.
    pub fn format_date(&self, value: &str) -> String {
        let display = lock(&self.inner).state.date_format.display;
        format_date(display, value)
    }

    /// Produce the next report number.
    ///
    /// With auto-increment on, the persisted counter (seeded from
    /// `numberStart`) supplies the number and is advanced by one; with it
    /// off, `numberStart` is always substituted and the counter is left
    /// alone.
    pub fn next_report_number(&self) -> String {
        let (format, start, auto_increment, storage) = {
            let guard = lock(&self.inner);
            (
                guard.state.report_settings.number_format.clone(),
                guard.state.report_settings.number_start,
                guard.state.report_settings.auto_increment,
                Arc::clone(&guard.storage),
            )
        };

        if auto_increment {
            let counter = match storage.get(COUNTER_KEY) {
                Ok(Some(raw)) => raw.trim().parse::<u32>().unwrap_or(start),
                Ok(None) => start,
                Err(e) => {
                    warn!("failed to read report counter, using start value: {e}");
                    start
                }
            };
            if let Err(e) = storage.put(COUNTER_KEY, &counter.saturating_add(1).to_string()) {
                error!("failed to advance report counter: {e}");
            }
            format.replace("{number}", &counter.to_string())
        } else {
            format.replace("{number}", &start.to_string())
        }
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        // A short-lived process must not lose edits still inside the
        // debounce window.
        self.flush();
    }
}

/// Handle for removing a subscribed listener. Cancellation is idempotent
/// and safe to call while a notification is in flight.
pub struct Subscription {
    inner: Weak<Mutex<Inner>>,
    id: u64,
}

impl Subscription {
    pub fn cancel(&self) {
        if let Some(inner) = self.inner.upgrade() {
            lock(&inner).listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

/// Format an amount with explicit currency settings. `Store::format_currency`
/// is the stateful wrapper.
pub fn format_currency(currency: &Currency, amount: f64) -> String {
    let fixed = format!("{:.*}", currency.decimals as usize, amount);

    let formatted = if currency.thousand_separator.is_empty() {
        fixed
    } else {
        let (int_part, frac_part) = match fixed.split_once('.') {
            Some((i, f)) => (i.to_string(), Some(f.to_string())),
            None => (fixed, None),
        };
        let mut grouped = group_thousands(&int_part, &currency.thousand_separator);
        if let Some(frac) = frac_part {
            grouped.push_str(&currency.decimal_separator);
            grouped.push_str(&frac);
        }
        grouped
    };

    match currency.position {
        CurrencyPosition::Before => format!("{}{}", currency.symbol, formatted),
        CurrencyPosition::After => format!("{}{}", formatted, currency.symbol),
    }
}

fn group_thousands(int_part: &str, separator: &str) -> String {
    let negative = int_part.starts_with('-');
    let digits = if negative { &int_part[1..] } else { int_part };

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push_str(&separator.chars().rev().collect::<String>());
        }
        out.push(ch);
    }
    let mut grouped: String = out.chars().rev().collect();
    if negative {
        grouped.insert(0, '-');
    }
    grouped
}

/// Format a `YYYY-MM-DD` value with an explicit display format.
pub fn format_date(display: DateFormat, value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") else {
        return value.to_string();
    };
    display
        .pattern()
        .replace("YYYY", &date.format("%Y").to_string())
        .replace("MM", &date.format("%m").to_string())
        .replace("DD", &date.format("%d").to_string())
}
