// ============================================================
// Layer 6 — Metric Tracker
// ============================================================
// Tracks one named scalar metric (loss, accuracy, …) over a run:
//
//   running state   val, avg, sum, count, max, min
//   history         every observed value, if enabled
//   listeners       callbacks fired on every update
//
// Lifecycle:
//   new() ──► update()* ──► save() / plot() ──► reset() ──► …
//
// Listener protocol:
//   update() snapshots the state before and after mutating, then
//   calls every listener with (prev, new) in the order they were
//   attached. Each listener runs exactly once per update.
//
// Output files (under <root>/<result_dir>/<name>/<sub_dir>/):
//   <metric>.txt   "max: 0.9120\nmin: 0.1034"
//   <metric>.csv   one value per line (history only)
//   <metric>.<fmt> rendered plot
//
// Reference: Rust Book §15 (Rc<T>, Cell<T>)
//            Rust Book §17 (Trait objects)

use anyhow::{ensure, Context, Result};
use std::{cell::Cell, fmt::Write as _, fs, path::Path, rc::Rc};

use crate::domain::traits::{MeterSnapshot, UpdateListener};
use crate::infra::experiment::ExperimentConfig;
use crate::infra::plot::{self, AxisLabels, PlotConfig};

/// Which extremes an update set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub is_max: bool,
    pub is_min: bool,
}

/// Running statistics for one metric.
pub struct MetricTracker {
    name:         String,
    sub_dir:      String,
    x_label:      Option<String>,
    experiment:   ExperimentConfig,
    plot_cfg:     PlotConfig,
    keep_history: bool,

    val:   f64,
    avg:   f64,
    sum:   f64,
    count: f64,
    max:   f64,
    min:   f64,

    history:   Vec<f64>,
    listeners: Vec<Box<dyn UpdateListener>>,
}

impl MetricTracker {
    /// Tracker for `name` writing under the experiment's results
    /// directory. History is off and the sub-directory is "."
    /// until configured with the builder methods.
    pub fn new(name: impl Into<String>, experiment: &ExperimentConfig) -> Self {
        Self {
            name:         name.into(),
            sub_dir:      ".".to_string(),
            x_label:      None,
            experiment:   experiment.clone(),
            plot_cfg:     PlotConfig::default(),
            keep_history: false,
            val:   f64::NAN,
            avg:   0.0,
            sum:   0.0,
            count: 0.0,
            max:   f64::NEG_INFINITY,
            min:   f64::INFINITY,
            history:   Vec::new(),
            listeners: Vec::new(),
        }
    }

    /// Retain every observed value (required for plot/plot_over)
    pub fn keep_history(mut self, keep: bool) -> Self {
        self.keep_history = keep;
        self
    }

    pub fn sub_dir(mut self, sub_dir: impl Into<String>) -> Self {
        self.sub_dir = sub_dir.into();
        self
    }

    pub fn x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = Some(label.into());
        self
    }

    pub fn plot_config(mut self, cfg: PlotConfig) -> Self {
        self.plot_cfg = cfg;
        self
    }

    /// Back to the initial state. History and listeners are discarded.
    ///
    /// `val` is NaN until the first observation, so any comparison a
    /// listener makes against the previous value fails on the first update.
    pub fn reset(&mut self) {
        self.val   = f64::NAN;
        self.avg   = 0.0;
        self.sum   = 0.0;
        self.count = 0.0;
        self.max   = f64::NEG_INFINITY;
        self.min   = f64::INFINITY;
        self.history.clear();
        self.listeners.clear();
    }

    /// Initialise the counters from an existing sequence in one pass.
    ///
    /// Counters are replaced, but retained history is appended to,
    /// so loading after earlier updates keeps those values in the
    /// history while the statistics describe `data` alone.
    pub fn load_array(&mut self, data: &[f64]) -> Result<()> {
        ensure!(!data.is_empty(), "cannot load metric '{}' from an empty sequence", self.name);

        let (mut max, mut min, mut sum) = (f64::NEG_INFINITY, f64::INFINITY, 0.0);
        for &v in data {
            max = max.max(v);
            min = min.min(v);
            sum += v;
        }

        self.max   = max;
        self.min   = min;
        self.sum   = sum;
        self.count = data.len() as f64;
        self.avg   = sum / self.count;
        self.val   = data[data.len() - 1];
        if self.keep_history {
            self.history.extend_from_slice(data);
        }

        tracing::debug!("Loaded {} values into metric '{}'", data.len(), self.name);
        Ok(())
    }

    /// Record one observation with unit weight.
    pub fn update(&mut self, value: f64) -> UpdateOutcome {
        self.update_weighted(value, 1.0)
    }

    /// Record one observation counted `weight` times in the average.
    ///
    /// While the total weight is not positive the average stays 0.
    pub fn update_weighted(&mut self, value: f64, weight: f64) -> UpdateOutcome {
        let prev = self.snapshot();

        self.val    = value;
        self.sum   += value * weight;
        self.count += weight;
        self.avg    = if self.count > 0.0 { self.sum / self.count } else { 0.0 };
        if self.keep_history {
            self.history.push(value);
        }

        let is_max = value > self.max;
        if is_max {
            self.max = value;
        }
        let is_min = value < self.min;
        if is_min {
            self.min = value;
        }

        let new = self.snapshot();
        for listener in self.listeners.iter_mut() {
            listener.notify(&prev, &new);
        }

        UpdateOutcome { is_max, is_min }
    }

    /// Write the max/min summary and, if retained, the history.
    pub fn save(&self) -> Result<()> {
        let dir = self.results_dir();

        let summary_path = dir.join(format!("{}.txt", self.name));
        fs::write(&summary_path, format!("max: {:.4}\nmin: {:.4}", self.max, self.min))
            .with_context(|| format!("Cannot write '{}'", summary_path.display()))?;

        if self.keep_history {
            let csv_path = dir.join(format!("{}.csv", self.name));
            let mut csv = String::with_capacity(self.history.len() * 26);
            for &v in &self.history {
                writeln!(csv, "{}", format_sci(v))?;
            }
            fs::write(&csv_path, csv)
                .with_context(|| format!("Cannot write '{}'", csv_path.display()))?;
        }

        tracing::debug!("Saved metric '{}' to '{}'", self.name, dir.display());
        Ok(())
    }

    /// Plot the history against the update number.
    pub fn plot(&self, scatter: bool) -> Result<()> {
        ensure!(self.keep_history, "metric '{}' does not retain its history", self.name);

        plot::plot_1d(
            &self.plot_cfg,
            &self.results_dir(),
            &self.name,
            &self.history,
            scatter,
            AxisLabels { x: self.x_label.as_deref(), y: Some(&self.name) },
        )?;
        Ok(())
    }

    /// Plot this history (x) against `other`'s history (y).
    /// Saved as `<this>_vs_<other>`.
    pub fn plot_over(&self, other: &MetricTracker, scatter: bool) -> Result<()> {
        ensure!(self.keep_history, "metric '{}' does not retain its history", self.name);
        ensure!(other.keep_history, "metric '{}' does not retain its history", other.name);

        plot::plot_2d(
            &self.plot_cfg,
            &self.results_dir(),
            &format!("{}_vs_{}", self.name, other.name),
            &self.history,
            &other.history,
            scatter,
            AxisLabels { x: Some(&self.name), y: Some(&other.name) },
        )?;
        Ok(())
    }

    /// Register any listener. Listeners run in attachment order.
    pub fn attach_listener(&mut self, listener: impl UpdateListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Register a listener that latches once `predicate(prev, new)`
    /// has held for `threshold` consecutive updates.
    pub fn attach_combo_listener<P>(&mut self, predicate: P, threshold: usize) -> ListenerHandle
    where
        P: FnMut(&MeterSnapshot, &MeterSnapshot) -> bool + 'static,
    {
        let listener = ComboListener::new(predicate, threshold);
        let handle = listener.handle();
        self.attach_listener(listener);
        handle
    }

    pub fn snapshot(&self) -> MeterSnapshot {
        MeterSnapshot {
            val:   self.val,
            avg:   self.avg,
            sum:   self.sum,
            count: self.count,
            max:   self.max,
            min:   self.min,
        }
    }

    pub fn name(&self)  -> &str { &self.name }
    pub fn val(&self)   -> f64  { self.val }
    pub fn avg(&self)   -> f64  { self.avg }
    pub fn sum(&self)   -> f64  { self.sum }
    /// Total weight of all observations
    pub fn count(&self) -> f64  { self.count }
    pub fn max(&self)   -> f64  { self.max }
    pub fn min(&self)   -> f64  { self.min }

    /// Observed values, or None if history is not retained
    pub fn history(&self) -> Option<&[f64]> {
        self.keep_history.then_some(self.history.as_slice())
    }

    fn results_dir(&self) -> std::path::PathBuf {
        self.experiment.results_dir(&self.sub_dir)
    }
}

// ─── ComboListener ────────────────────────────────────────────────────────────
/// Two-state listener: untriggered until the predicate holds for
/// `threshold` updates in a row, then triggered for good.
///
/// A failing predicate resets the streak but never the flag.
pub struct ComboListener<P> {
    predicate: P,
    threshold: usize,
    streak:    usize,
    flag:      Rc<Cell<bool>>,
}

impl<P> ComboListener<P>
where
    P: FnMut(&MeterSnapshot, &MeterSnapshot) -> bool,
{
    pub fn new(predicate: P, threshold: usize) -> Self {
        Self {
            predicate,
            threshold,
            streak: 0,
            flag: Rc::new(Cell::new(false)),
        }
    }

    /// Handle for polling the flag after the listener is attached
    pub fn handle(&self) -> ListenerHandle {
        ListenerHandle { flag: Rc::clone(&self.flag) }
    }
}

impl<P> UpdateListener for ComboListener<P>
where
    P: FnMut(&MeterSnapshot, &MeterSnapshot) -> bool,
{
    fn notify(&mut self, prev: &MeterSnapshot, new: &MeterSnapshot) {
        if (self.predicate)(prev, new) {
            self.streak += 1;
        } else {
            self.streak = 0;
        }
        if self.streak >= self.threshold {
            self.flag.set(true);
        }
    }
}

/// Read-only view of a ComboListener's flag
#[derive(Debug, Clone)]
pub struct ListenerHandle {
    flag: Rc<Cell<bool>>,
}

impl ListenerHandle {
    pub fn is_triggered(&self) -> bool {
        self.flag.get()
    }
}

/// Read a history file written by `MetricTracker::save`.
///
/// Values may be separated by newlines or commas; blank lines are skipped.
pub fn read_history(path: &Path) -> Result<Vec<f64>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;

    let mut values = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        for field in line.split(',').map(str::trim).filter(|f| !f.is_empty()) {
            let v = field.parse::<f64>().with_context(|| {
                format!("{}:{}: '{}' is not a number", path.display(), lineno + 1, field)
            })?;
            values.push(v);
        }
    }
    Ok(values)
}

/// `%.18e` as numpy writes it: signed exponent of at least two digits.
fn format_sci(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }

    let raw = format!("{v:.18e}");
    match raw.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exp.abs())
        }
        None => raw,
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::TempDir;

    fn experiment(tmp: &TempDir) -> ExperimentConfig {
        ExperimentConfig {
            root: tmp.path().to_path_buf(),
            name: "exp".into(),
            ..Default::default()
        }
    }

    fn tracker() -> MetricTracker {
        MetricTracker::new("loss", &ExperimentConfig::default())
    }

    #[test]
    fn test_two_updates() {
        let mut m = tracker();
        assert_eq!(m.update(5.0), UpdateOutcome { is_max: true, is_min: true });
        assert_eq!(m.update(3.0), UpdateOutcome { is_max: false, is_min: true });

        assert_eq!(m.max(), 5.0);
        assert_eq!(m.min(), 3.0);
        assert_eq!(m.avg(), 4.0);
        assert_eq!(m.count(), 2.0);
        assert_eq!(m.sum(), 8.0);
        assert_eq!(m.val(), 3.0);
    }

    #[test]
    fn test_weighted_update() {
        let mut m = tracker();
        m.update_weighted(1.0, 3.0);
        m.update(5.0);
        assert_eq!(m.count(), 4.0);
        assert_eq!(m.avg(), 2.0);
    }

    #[test]
    fn test_zero_weight_first_update_keeps_avg_finite() {
        let mut m = tracker();
        assert_eq!(m.update_weighted(7.0, 0.0), UpdateOutcome { is_max: true, is_min: true });
        assert_eq!(m.avg(), 0.0);
        assert_eq!(m.count(), 0.0);
        assert_eq!(m.val(), 7.0);

        m.update_weighted(3.0, 2.0);
        assert_eq!(m.avg(), 3.0);
    }

    #[test]
    fn test_load_array_then_update() {
        let mut m = tracker();
        m.load_array(&[1.0, 2.0, 3.0]).unwrap();
        m.update(4.0);

        assert_eq!(m.max(), 4.0);
        assert_eq!(m.min(), 1.0);
        assert_eq!(m.avg(), 2.5);
        assert_eq!(m.count(), 4.0);
    }

    #[test]
    fn test_load_array_appends_history_but_replaces_counters() {
        let mut m = tracker().keep_history(true);
        m.update(10.0);
        m.load_array(&[1.0, 2.0]).unwrap();

        assert_eq!(m.history(), Some(&[10.0, 1.0, 2.0][..]));
        assert_eq!(m.count(), 2.0);
        assert_eq!(m.max(), 2.0);
        assert_eq!(m.val(), 2.0);
    }

    #[test]
    fn test_load_empty_array_fails() {
        assert!(tracker().load_array(&[]).is_err());
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut m = tracker().keep_history(true);
        let handle = m.attach_combo_listener(|_, _| true, 1);
        m.update(2.0);
        assert!(handle.is_triggered());

        m.reset();
        assert_eq!(m.max(), f64::NEG_INFINITY);
        assert_eq!(m.min(), f64::INFINITY);
        assert_eq!(m.count(), 0.0);
        assert_eq!(m.history(), Some(&[][..]));

        // Listener was detached by reset; its flag stays as it was
        m.update(1.0);
        assert!(handle.is_triggered());
    }

    #[test]
    fn test_combo_listener_latches_after_three_increases() {
        let mut m = tracker();
        let rising = m.attach_combo_listener(|prev, new| new.val > prev.val, 2);

        m.update(1.0);
        assert!(!rising.is_triggered());
        m.update(2.0);
        assert!(!rising.is_triggered());
        m.update(3.0);
        assert!(rising.is_triggered());

        // Sticky once triggered
        m.update(0.0);
        assert!(rising.is_triggered());
    }

    #[test]
    fn test_combo_listener_streak_resets_on_failure() {
        let mut m = tracker();
        let rising = m.attach_combo_listener(|prev, new| new.val > prev.val, 2);

        for v in [1.0, 2.0, 0.0] {
            m.update(v);
            assert!(!rising.is_triggered());
        }
    }

    #[test]
    fn test_listeners_run_in_attachment_order() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut m = tracker();

        for id in 0..3 {
            let calls = Rc::clone(&calls);
            m.attach_listener(move |prev: &MeterSnapshot, new: &MeterSnapshot| {
                calls.borrow_mut().push((id, prev.count, new.count));
            });
        }
        m.update(1.0);
        m.update(2.0);

        assert_eq!(
            *calls.borrow(),
            vec![(0, 0.0, 1.0), (1, 0.0, 1.0), (2, 0.0, 1.0), (0, 1.0, 2.0), (1, 1.0, 2.0), (2, 1.0, 2.0)]
        );
    }

    #[test]
    fn test_save_writes_summary_and_history() {
        let tmp = TempDir::new().unwrap();
        let exp = experiment(&tmp);
        exp.ensure_dirs("train").unwrap();

        let mut m = MetricTracker::new("acc", &exp).keep_history(true).sub_dir("train");
        m.update(0.5);
        m.update(0.25);
        m.save().unwrap();

        let dir = exp.results_dir("train");
        let summary = fs::read_to_string(dir.join("acc.txt")).unwrap();
        assert_eq!(summary, "max: 0.5000\nmin: 0.2500");

        let csv = fs::read_to_string(dir.join("acc.csv")).unwrap();
        assert_eq!(csv.lines().next(), Some("5.000000000000000000e-01"));
        assert_eq!(read_history(&dir.join("acc.csv")).unwrap(), vec![0.5, 0.25]);
    }

    #[test]
    fn test_save_without_history_skips_csv() {
        let tmp = TempDir::new().unwrap();
        let exp = experiment(&tmp);
        exp.ensure_dirs(".").unwrap();

        let mut m = MetricTracker::new("loss", &exp);
        m.update(1.0);
        m.save().unwrap();

        assert!(exp.results_dir(".").join("loss.txt").is_file());
        assert!(!exp.results_dir(".").join("loss.csv").exists());
    }

    #[test]
    fn test_plot_requires_history() {
        let tmp = TempDir::new().unwrap();
        let exp = experiment(&tmp);
        exp.ensure_dirs(".").unwrap();

        let mut m = MetricTracker::new("loss", &exp);
        m.update(1.0);
        assert!(m.plot(true).is_err());

        let other = MetricTracker::new("acc", &exp).keep_history(true);
        assert!(other.plot_over(&m, true).is_err());
    }

    #[test]
    fn test_plot_and_plot_over_write_images() {
        let tmp = TempDir::new().unwrap();
        let exp = experiment(&tmp);
        exp.ensure_dirs(".").unwrap();

        let mut loss = MetricTracker::new("loss", &exp).keep_history(true).x_label("epoch");
        let mut acc  = MetricTracker::new("acc", &exp).keep_history(true);
        for (l, a) in [(2.0, 0.3), (1.0, 0.6), (0.5, 0.8)] {
            loss.update(l);
            acc.update(a);
        }

        loss.plot(false).unwrap();
        loss.plot_over(&acc, true).unwrap();

        let dir = exp.results_dir(".");
        assert!(dir.join("loss.jpg").is_file());
        assert!(dir.join("loss_vs_acc.jpg").is_file());
    }

    #[test]
    fn test_plot_over_needs_equal_lengths() {
        let tmp = TempDir::new().unwrap();
        let exp = experiment(&tmp);
        exp.ensure_dirs(".").unwrap();

        let mut a = MetricTracker::new("a", &exp).keep_history(true);
        let mut b = MetricTracker::new("b", &exp).keep_history(true);
        a.update(1.0);
        a.update(2.0);
        b.update(1.0);
        assert!(a.plot_over(&b, true).is_err());
    }

    #[test]
    fn test_format_sci_matches_numpy() {
        assert_eq!(format_sci(5.0), "5.000000000000000000e+00");
        assert_eq!(format_sci(-0.00125), "-1.250000000000000026e-03");
        assert_eq!(format_sci(1024.0), "1.024000000000000000e+03");
        assert_eq!(format_sci(f64::NAN), "nan");
    }

    #[test]
    fn test_read_history_reports_bad_line() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("h.csv");
        fs::write(&path, "1.0\n\n2.0\nabc\n").unwrap();
        let err = read_history(&path).unwrap_err();
        assert!(format!("{err:#}").contains(":4"));
    }
}
