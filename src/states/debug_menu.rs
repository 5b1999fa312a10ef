//! Debug Menu
//!
//! Buttons that exercise crash reporting and analytics so a build can be
//! checked against the backend dashboards.
//!
//! # Actions
//!
//! - crash now, optionally after breadcrumbs or custom keys
//! - record a non-fatal error
//! - time simulated blocking work and flag calls long enough to freeze the
//!   main thread
//! - log a progress event and a score event
//!
//! The crash reporter decides what "crash" means. The default one only logs.

use super::base::{State, StateContext, StateKind, StateResult, Transition};
use super::exit_value::StateExitValue;
use crate::error::StateError;
use crate::game::GameContext;
use crate::services::EventValue;
use crate::ui::views::DebugMenuView;
use crate::ui::{Anchor, GuiOverlay, Rgba, StateUi, UiEvent, ViewId};
use chrono::{Local, NaiveTime, Timelike};
use std::fmt;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

const CURRENT_TIME_KEY: &str = "Current Time";
const CURRENT_FUNCTION_KEY: &str = "Current Async Function";

/// Blocking work at or above this length may freeze the main thread
pub const SEVERE_DURATION_MS: u64 = 4500;
/// Blocking work at or above this length freezes the main thread
pub const EXTREME_DURATION_MS: u64 = 5000;
const SAFE_DURATION_MS: u64 = 1000;

/// Hours added to the clock to guarantee a different [`DayPhase`]
pub const PHASE_CHANGE_HOURS: i64 = 9;

/// Coarse part of the day, used as a low-cardinality crash report key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPhase {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl DayPhase {
    pub fn of(time: NaiveTime) -> Self {
        match time.hour() {
            21.. | 0..5 => DayPhase::Night,
            17.. => DayPhase::Evening,
            12.. => DayPhase::Afternoon,
            _ => DayPhase::Morning,
        }
    }
}

impl fmt::Display for DayPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Stand-in for work that blocks the calling thread
pub trait WorkSimulator {
    /// Blocks for roughly `duration` and returns how long it actually took
    fn block_for(&mut self, duration: Duration) -> Duration;
}

/// Blocks by sleeping on a worker thread and joining it
#[derive(Debug, Default)]
pub struct ThreadSleepSimulator;

impl WorkSimulator for ThreadSleepSimulator {
    fn block_for(&mut self, duration: Duration) -> Duration {
        let started = Instant::now();
        if thread::spawn(move || thread::sleep(duration)).join().is_err() {
            tracing::warn!("simulated work thread panicked");
        }
        started.elapsed()
    }
}

#[derive(Debug, Error)]
#[error("test error raised in {0}")]
struct DemoError(&'static str);

pub struct DebugMenu {
    prefab: String,
    ui: StateUi<DebugMenuView>,
    work: Box<dyn WorkSimulator>,
    /// Whether the platform reports frozen main threads on its own
    reports_frozen_main_thread: bool,
}

impl DebugMenu {
    pub fn new(prefab: &str) -> Self {
        DebugMenu {
            prefab: prefab.to_string(),
            ui: StateUi::new(),
            work: Box::new(ThreadSleepSimulator),
            reports_frozen_main_thread: cfg!(target_os = "android"),
        }
    }

    pub fn with_work_simulator(mut self, work: Box<dyn WorkSimulator>) -> Self {
        self.work = work;
        self
    }

    pub fn with_frozen_thread_reports(mut self, enabled: bool) -> Self {
        self.reports_frozen_main_thread = enabled;
        self
    }

    fn initialize_ui(&mut self, ctx: &mut StateContext<'_>) -> Result<(), StateError> {
        self.ui.spawn_from(ctx.ui, &self.prefab)?;
        self.ui.show(ctx.ui);
        Ok(())
    }

    fn log_nonfatal_error(ctx: &mut StateContext<'_>) {
        let error = DemoError("log_nonfatal_error");
        ctx.game.services.crash.log_exception(&error);
    }

    fn log_strings_and_crash_now(ctx: &mut StateContext<'_>) {
        let crash = &mut ctx.game.services.crash;
        crash.log("This is the first of two descriptive strings in log_strings_and_crash_now");
        crash.log("A log that will simply inform you which path of logic was taken");
        crash.log("This is the second of two descriptive strings in log_strings_and_crash_now");
        crash.force_crash();
    }

    fn set_custom_key_and_crash_now(ctx: &mut StateContext<'_>) {
        let crash = &mut ctx.game.services.crash;
        let now = Local::now().time();
        crash.set_custom_key(CURRENT_TIME_KEY, &DayPhase::of(now).to_string());

        let later = now + chrono::Duration::hours(PHASE_CHANGE_HOURS);
        crash.set_custom_key(CURRENT_TIME_KEY, &DayPhase::of(later).to_string());
        crash.force_crash();
    }

    fn set_logs_and_keys_before_freezing(
        &mut self,
        ctx: &mut StateContext<'_>,
    ) -> Result<(), StateError> {
        self.wait_and_record(ctx, "do_safe_work", SAFE_DURATION_MS)?;
        self.wait_and_record(ctx, "do_severe_work", SEVERE_DURATION_MS)?;
        self.wait_and_record(ctx, "do_extreme_work", 2 * EXTREME_DURATION_MS)
    }

    /// Runs simulated work under a custom key naming the method. If the work
    /// freezes the process the key shows where it happened.
    fn wait_and_record(
        &mut self,
        ctx: &mut StateContext<'_>,
        method: &str,
        target_ms: u64,
    ) -> Result<(), StateError> {
        let crash = &mut ctx.game.services.crash;
        crash.set_custom_key(CURRENT_FUNCTION_KEY, method);

        let elapsed_ms = self.work.block_for(Duration::from_millis(target_ms)).as_millis() as u64;

        if elapsed_ms >= EXTREME_DURATION_MS {
            crash.log(&format!(
                "'{}' is long enough to freeze the main thread on Android",
                method
            ));
            if !self.reports_frozen_main_thread {
                return Err(StateError::MainThreadBlocked {
                    method: method.to_string(),
                    elapsed_ms,
                });
            }
        } else if elapsed_ms >= SEVERE_DURATION_MS {
            crash.log(&format!(
                "'{}' is long enough it may cause an ANR on Android",
                method
            ));
        }
        Ok(())
    }
}

impl State for DebugMenu {
    fn kind(&self) -> StateKind {
        StateKind::DebugMenu
    }

    fn view(&self) -> Option<ViewId> {
        self.ui.id()
    }

    fn initialize(&mut self, ctx: &mut StateContext<'_>) -> Result<(), StateError> {
        self.initialize_ui(ctx)
    }

    fn resume(
        &mut self,
        ctx: &mut StateContext<'_>,
        _exit_value: Option<StateExitValue>,
    ) -> Result<(), StateError> {
        self.initialize_ui(ctx)
    }

    fn suspend(&mut self, ctx: &mut StateContext<'_>) {
        self.ui.hide(ctx.ui);
    }

    fn cleanup(&mut self, ctx: &mut StateContext<'_>) -> Option<StateExitValue> {
        self.ui.destroy(ctx.ui);
        None
    }

    fn handle_ui_event(&mut self, ctx: &mut StateContext<'_>, event: &UiEvent) -> StateResult {
        let Some(menu) = self.ui.get() else {
            return Ok(Transition::None);
        };
        let source = event.source;

        if source == menu.back {
            return Ok(Transition::Pop);
        } else if source == menu.crash_now {
            ctx.game.services.crash.force_crash();
        } else if source == menu.log_nonfatal_error {
            Self::log_nonfatal_error(ctx);
        } else if source == menu.log_strings_and_crash_now {
            Self::log_strings_and_crash_now(ctx);
        } else if source == menu.set_custom_key_and_crash_now {
            Self::set_custom_key_and_crash_now(ctx);
        } else if source == menu.set_logs_and_keys_before_anr {
            self.set_logs_and_keys_before_freezing(ctx)?;
        } else if source == menu.log_progress_event {
            ctx.game
                .services
                .analytics
                .log_event("progress", "percent", EventValue::Float(0.4));
        } else if source == menu.log_int_score {
            ctx.game
                .services
                .analytics
                .log_event("post_score", "score", EventValue::Int(42));
        } else if source == menu.set_user_bored_of_subtitle {
            return Err(StateError::NotSupported {
                feature: "set_user_bored_of_subtitle",
            });
        } else if source == menu.set_user_enjoys_subtitle {
            return Err(StateError::NotSupported {
                feature: "set_user_enjoys_subtitle",
            });
        }
        Ok(Transition::None)
    }

    fn on_gui(&self, _game: &GameContext, overlay: &mut GuiOverlay) {
        let phase = DayPhase::of(Local::now().time());
        overlay.label(
            format!("PART OF DAY: {}", phase),
            12,
            Rgba::WHITE,
            Anchor::BottomLeft,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{Analytics, CrashReporter, Services};
    use crate::states::{LifecyclePhase, StateManager};
    use crate::states::main_menu::MainMenu;
    use crate::states::test_support::{click, fixture};
    use crate::ui::views::DEBUG_MENU_PREFAB;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Record = Rc<RefCell<Vec<String>>>;

    struct RecordingCrashReporter(Record);

    impl CrashReporter for RecordingCrashReporter {
        fn log(&mut self, message: &str) {
            self.0.borrow_mut().push(format!("log: {}", message));
        }

        fn log_exception(&mut self, error: &dyn std::error::Error) {
            self.0.borrow_mut().push(format!("exception: {}", error));
        }

        fn set_custom_key(&mut self, key: &str, value: &str) {
            self.0.borrow_mut().push(format!("key: {}={}", key, value));
        }

        fn force_crash(&mut self) {
            self.0.borrow_mut().push("crash".to_string());
        }
    }

    struct RecordingAnalytics(Record);

    impl Analytics for RecordingAnalytics {
        fn log_event(&mut self, name: &str, parameter: &str, value: EventValue) {
            self.0
                .borrow_mut()
                .push(format!("event: {} {}={}", name, parameter, value));
        }
    }

    /// Reports exactly the requested duration without blocking
    struct InstantWork(Rc<RefCell<Vec<u64>>>);

    impl WorkSimulator for InstantWork {
        fn block_for(&mut self, duration: Duration) -> Duration {
            self.0.borrow_mut().push(duration.as_millis() as u64);
            duration
        }
    }

    struct Harness {
        manager: StateManager,
        record: Record,
        waits: Rc<RefCell<Vec<u64>>>,
    }

    fn harness(ctx: &mut StateContext<'_>, reports_frozen_main_thread: bool) -> Harness {
        let record: Record = Rc::new(RefCell::new(Vec::new()));
        ctx.game.services = Services::new(
            Box::new(RecordingCrashReporter(Rc::clone(&record))),
            Box::new(RecordingAnalytics(Rc::clone(&record))),
        );

        let waits = Rc::new(RefCell::new(Vec::new()));
        let debug_menu = DebugMenu::new(DEBUG_MENU_PREFAB)
            .with_work_simulator(Box::new(InstantWork(Rc::clone(&waits))))
            .with_frozen_thread_reports(reports_frozen_main_thread);

        let mut manager = StateManager::new();
        manager.push_state(Box::new(MainMenu::new()), ctx).unwrap();
        manager.push_state(Box::new(debug_menu), ctx).unwrap();
        Harness {
            manager,
            record,
            waits,
        }
    }

    fn press(harness: &mut Harness, ctx: &mut StateContext<'_>, name: &str) -> Result<(), StateError> {
        let event = click(&harness.manager, ctx.ui, name);
        harness.manager.handle_ui_event(ctx, &event)
    }

    fn taken(record: &Record) -> Vec<String> {
        std::mem::take(&mut *record.borrow_mut())
    }

    #[test]
    fn test_day_phase_boundaries() {
        let at = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        assert_eq!(DayPhase::of(at(4, 59)), DayPhase::Night);
        assert_eq!(DayPhase::of(at(5, 0)), DayPhase::Morning);
        assert_eq!(DayPhase::of(at(11, 59)), DayPhase::Morning);
        assert_eq!(DayPhase::of(at(12, 0)), DayPhase::Afternoon);
        assert_eq!(DayPhase::of(at(17, 0)), DayPhase::Evening);
        assert_eq!(DayPhase::of(at(20, 59)), DayPhase::Evening);
        assert_eq!(DayPhase::of(at(21, 0)), DayPhase::Night);
        assert_eq!(DayPhase::of(at(0, 0)), DayPhase::Night);
    }

    #[test]
    fn test_phase_change_shift_always_changes_phase() {
        for hour in 0..24 {
            let time = NaiveTime::from_hms_opt(hour, 30, 0).unwrap();
            let later = time + chrono::Duration::hours(PHASE_CHANGE_HOURS);
            assert_ne!(DayPhase::of(time), DayPhase::of(later), "hour {}", hour);
        }
    }

    #[test]
    fn test_crash_actions() {
        let (mut game, mut ui) = fixture();
        let mut ctx = StateContext::new(&mut game, &mut ui);
        let mut h = harness(&mut ctx, false);

        press(&mut h, &mut ctx, "crash_now").unwrap();
        assert_eq!(taken(&h.record), vec!["crash"]);

        press(&mut h, &mut ctx, "log_nonfatal_error").unwrap();
        assert_eq!(
            taken(&h.record),
            vec!["exception: test error raised in log_nonfatal_error"]
        );

        press(&mut h, &mut ctx, "log_strings_and_crash_now").unwrap();
        let calls = taken(&h.record);
        assert_eq!(calls.len(), 4);
        assert!(calls[..3].iter().all(|c| c.starts_with("log: ")));
        assert_eq!(calls[3], "crash");

        press(&mut h, &mut ctx, "set_custom_key_and_crash_now").unwrap();
        let calls = taken(&h.record);
        assert_eq!(calls.len(), 3);
        assert!(calls[0].starts_with("key: Current Time="));
        assert!(calls[1].starts_with("key: Current Time="));
        assert_ne!(calls[0], calls[1]);
        assert_eq!(calls[2], "crash");
    }

    #[test]
    fn test_analytics_events() {
        let (mut game, mut ui) = fixture();
        let mut ctx = StateContext::new(&mut game, &mut ui);
        let mut h = harness(&mut ctx, false);

        press(&mut h, &mut ctx, "log_progress_event").unwrap();
        press(&mut h, &mut ctx, "log_int_score").unwrap();
        assert_eq!(
            taken(&h.record),
            vec!["event: progress percent=0.4", "event: post_score score=42"]
        );
    }

    #[test]
    fn test_blocking_work_fails_where_nothing_reports_it() {
        let (mut game, mut ui) = fixture();
        let mut ctx = StateContext::new(&mut game, &mut ui);
        let mut h = harness(&mut ctx, false);

        let err = press(&mut h, &mut ctx, "set_logs_and_keys_before_anr").unwrap_err();
        assert!(matches!(
            err,
            StateError::MainThreadBlocked { ref method, elapsed_ms: 10_000 } if method == "do_extreme_work"
        ));
        assert!(!err.is_fatal());
        assert_eq!(*h.waits.borrow(), vec![1000, 4500, 10_000]);

        let calls = taken(&h.record);
        assert_eq!(
            calls,
            vec![
                "key: Current Async Function=do_safe_work",
                "key: Current Async Function=do_severe_work",
                "log: 'do_severe_work' is long enough it may cause an ANR on Android",
                "key: Current Async Function=do_extreme_work",
                "log: 'do_extreme_work' is long enough to freeze the main thread on Android",
            ]
        );
        // The menu stays on top
        assert_eq!(h.manager.current_kind(), Some(StateKind::DebugMenu));
    }

    #[test]
    fn test_blocking_work_only_logs_where_the_platform_reports_it() {
        let (mut game, mut ui) = fixture();
        let mut ctx = StateContext::new(&mut game, &mut ui);
        let mut h = harness(&mut ctx, true);

        press(&mut h, &mut ctx, "set_logs_and_keys_before_anr").unwrap();
        assert_eq!(taken(&h.record).len(), 5);
    }

    #[test]
    fn test_subtitle_sentiment_is_not_supported() {
        let (mut game, mut ui) = fixture();
        let mut ctx = StateContext::new(&mut game, &mut ui);
        let mut h = harness(&mut ctx, false);

        for name in ["set_user_bored_of_subtitle", "set_user_enjoys_subtitle"] {
            let err = press(&mut h, &mut ctx, name).unwrap_err();
            assert!(matches!(err, StateError::NotSupported { feature } if feature == name));
            assert!(!err.is_fatal());
        }
    }

    #[test]
    fn test_back_pops_and_gui_shows_day_phase() {
        let (mut game, mut ui) = fixture();
        let mut ctx = StateContext::new(&mut game, &mut ui);
        let mut h = harness(&mut ctx, false);

        let mut overlay = GuiOverlay::new();
        h.manager.on_gui(ctx.game, &mut overlay);
        assert!(overlay.labels()[0].text.starts_with("PART OF DAY: "));

        press(&mut h, &mut ctx, "back").unwrap();
        assert_eq!(h.manager.kinds(), vec![StateKind::MainMenu]);
    }

    #[test]
    fn test_unknown_prefab_fails_to_initialize() {
        let (mut game, mut ui) = fixture();
        let mut ctx = StateContext::new(&mut game, &mut ui);
        let mut manager = StateManager::new();
        manager.push_state(Box::new(MainMenu::new()), &mut ctx).unwrap();

        let err = manager
            .push_state(Box::new(DebugMenu::new("NoSuchPrefab")), &mut ctx)
            .unwrap_err();
        assert!(matches!(err, StateError::Ui(_)));
        assert!(!err.is_fatal());
        assert_eq!(manager.kinds(), vec![StateKind::MainMenu]);
        assert_eq!(manager.current_phase(), Some(LifecyclePhase::Active));
        assert_eq!(ctx.ui.visible_views().count(), 1);
    }
}
