use crate::ui;
use bau_cua::{
    Animal,
    GameConfig,
    Notice,
    Phase,
    Scheduled,
    Table,
    Variant,
    dice::DICE,
    notice::format_coins,
    table::{
        Ack,
        Die,
        RoundRecord,
    },
};
use color_eyre::eyre::{
    Result,
    WrapErr,
};
use futures::{
    FutureExt,
    StreamExt,
    future::BoxFuture,
    stream::FuturesUnordered,
};
use rand::{
    SeedableRng,
    rngs::StdRng,
};
use std::{
    collections::VecDeque,
    fs,
    path::{
        Path,
        PathBuf,
    },
    time::{
        Duration,
        Instant,
    },
};
use tokio::time;
use tracing::{
    debug,
    info,
    warn,
};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling,
};
use tracing_subscriber::{
    EnvFilter,
    fmt,
};

pub const DEFAULT_LOG_DIR: &str = "./logs";
const LOG_FILE_PREFIX: &str = "bau-cua.log";
const FRAME_INTERVAL: Duration = Duration::from_millis(120);
const TOAST_TTL: Duration = Duration::from_millis(3000);
const MAX_TOASTS: usize = 4;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub variant: Variant,
    pub seed: Option<u64>,
    pub game: GameConfig,
    pub log_dir: PathBuf,
}

/// Logs go to a daily file; the terminal belongs to the table.
pub fn init_tracing(log_dir: &Path) -> Result<WorkerGuard> {
    fs::create_dir_all(log_dir)
        .wrap_err_with(|| format!("creating log dir {}", log_dir.display()))?;
    let appender = rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();
    Ok(guard)
}

#[derive(Clone, Debug)]
struct Toast {
    notice: Notice,
    shown_at: Instant,
}

#[derive(Clone, Debug)]
pub struct AppSnapshot {
    pub variant: Variant,
    pub phase: Phase,
    pub dice: [Die; DICE],
    pub balance: u64,
    pub bets: Vec<(Animal, u64)>,
    pub winners: Vec<Animal>,
    pub favor_active: bool,
    pub history: Vec<RoundRecord>,
    pub toasts: Vec<Notice>,
    pub status: String,
    pub frame: u64,
}

impl AppSnapshot {
    pub fn bet_on(&self, animal: Animal) -> u64 {
        self.bets
            .iter()
            .find(|(a, _)| *a == animal)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }
}

pub struct AppController {
    table: Table<StdRng>,
    toasts: VecDeque<Toast>,
    status: String,
    frame: u64,
}

impl AppController {
    pub fn new(config: &AppConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let status = match config.variant {
            Variant::Wager => String::from("Place your bets"),
            Variant::Free => String::from("Ready"),
        };
        Self {
            table: Table::new(config.variant, config.game.clone(), rng),
            toasts: VecDeque::new(),
            status,
            frame: 0,
        }
    }

    pub fn snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            variant: self.table.variant(),
            phase: self.table.phase(),
            dice: *self.table.dice(),
            balance: self.table.balance(),
            bets: self.table.bets().iter().collect(),
            winners: self.table.winners().to_vec(),
            favor_active: self.table.favor_active(),
            history: self.table.history().cloned().collect(),
            toasts: self.toasts.iter().map(|t| t.notice.clone()).collect(),
            status: self.status.clone(),
            frame: self.frame,
        }
    }

    pub fn tap(&mut self, zone: Option<u8>, card: Option<u8>) {
        match self.table.variant() {
            Variant::Wager => {
                if let Some(zone) = zone {
                    let _ = self.table.tap_zone(zone);
                }
                if let Some(animal) = card.and_then(Animal::from_position) {
                    self.place_bet(animal);
                }
            }
            Variant::Free => {
                if let Some(position) = card {
                    let _ = self.table.tap_card(position);
                }
            }
        }
    }

    /// Feeds the favor detector from a click that also pressed a button.
    pub fn zone_tap(&mut self, zone: Option<u8>) {
        if let Some(zone) = zone {
            let _ = self.table.tap_zone(zone);
        }
    }

    fn place_bet(&mut self, animal: Animal) {
        match self.table.place_bet(animal) {
            Ok(Ack::Applied) => {
                self.status = format!(
                    "Placed {} on {} ({} total)",
                    format_coins(self.table.config().bet_step),
                    animal.vietnamese(),
                    format_coins(self.table.bets().amount(animal)),
                );
            }
            Ok(Ack::Ignored) => {}
            Err(e) => self.status = format!("Bet rejected: {e}"),
        }
    }

    pub fn roll(&mut self) {
        match self.table.roll() {
            Ok(Ack::Applied) => self.status = format!("Rolling round {}", self.table.round()),
            Ok(Ack::Ignored) => {}
            Err(e) => self.status = format!("Roll rejected: {e}"),
        }
    }

    pub fn reset(&mut self) {
        self.table.reset();
        self.toasts.clear();
        self.status = String::from("Table reset");
    }

    pub fn fire(&mut self, scheduled: Scheduled) {
        if self.table.fire(scheduled) == Ack::Applied {
            self.status = match self.table.phase() {
                Phase::Betting => String::from("Place your bets"),
                Phase::Rolling => String::from("Rolling"),
                Phase::WaitingForTap => String::from("Tap an animal"),
                Phase::Result => format!("Round {} settled", self.table.round()),
            };
        }
    }

    pub fn tick(&mut self) {
        self.frame = self.frame.wrapping_add(1);
        let now = Instant::now();
        while self
            .toasts
            .front()
            .is_some_and(|t| now.duration_since(t.shown_at) >= TOAST_TTL)
        {
            self.toasts.pop_front();
        }
    }

    /// Moves queued notices into toasts and returns timers to arm.
    pub fn pump(&mut self) -> Vec<Scheduled> {
        for notice in self.table.drain_notices() {
            info!(notice = %notice, "notice");
            self.toasts.push_back(Toast {
                notice,
                shown_at: Instant::now(),
            });
        }
        while self.toasts.len() > MAX_TOASTS {
            self.toasts.pop_front();
        }
        self.table.drain_scheduled()
    }
}

type TimerFuture = BoxFuture<'static, Scheduled>;

fn arm(timers: &mut FuturesUnordered<TimerFuture>, scheduled: Vec<Scheduled>) {
    for s in scheduled {
        debug!(kind = ?s.kind, delay_ms = s.delay.as_millis() as u64, "timer armed");
        timers.push(
            async move {
                time::sleep(s.delay).await;
                s
            }
            .boxed(),
        );
    }
}

pub async fn run_app(config: AppConfig) -> Result<()> {
    let controller = AppController::new(&config);
    let mut ui_state = ui::UiState::default();
    let mut input_events = ui::input_event_stream();

    info!(variant = ?config.variant, seed = ?config.seed, "starting table");
    ui::terminal_enter(&mut ui_state)?;
    let res = run_loop(controller, &mut ui_state, &mut input_events).await;
    ui::terminal_exit()?;
    res
}

async fn run_loop(
    mut controller: AppController,
    ui_state: &mut ui::UiState,
    input_events: &mut ui::InputEventReceiver,
) -> Result<()> {
    let mut ticker = time::interval(FRAME_INTERVAL);
    let mut timers: FuturesUnordered<TimerFuture> = FuturesUnordered::new();
    ui::draw(ui_state, &controller.snapshot())?;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => { break; }
            _ = ticker.tick() => controller.tick(),
            Some(fired) = timers.next(), if !timers.is_empty() => controller.fire(fired),
            maybe_event = input_events.recv() => {
                let Some(event) = maybe_event else {
                    warn!("input stream closed");
                    break;
                };
                match ui::translate(ui_state, event) {
                    Some(ui::UserEvent::Quit) => break,
                    Some(ui::UserEvent::Tap { zone, card }) => controller.tap(zone, card),
                    Some(ui::UserEvent::Roll { zone }) => {
                        controller.roll();
                        controller.zone_tap(zone);
                    }
                    Some(ui::UserEvent::Reset { zone }) => {
                        controller.reset();
                        controller.zone_tap(zone);
                    }
                    Some(ui::UserEvent::Redraw) | None => {}
                }
            }
        }
        arm(&mut timers, controller.pump());
        ui::draw(ui_state, &controller.snapshot())?;
    }
    info!("leaving table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bau_cua::timers::TimerKind;

    fn config(variant: Variant) -> AppConfig {
        AppConfig {
            variant,
            seed: Some(42),
            game: GameConfig::default(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
        }
    }

    #[test]
    fn card_click_places_bet_and_feeds_zone() {
        let mut controller = AppController::new(&config(Variant::Wager));
        controller.tap(Some(1), Some(Animal::Deer.position()));
        let snap = controller.snapshot();
        assert_eq!(snap.bet_on(Animal::Deer), 100);
        assert_eq!(snap.balance, 9_900);
        assert!(controller.pump().iter().any(|s| s.kind == TimerKind::TapIdle));
    }

    #[test]
    fn roll_button_clicks_count_toward_favor() {
        let mut controller = AppController::new(&config(Variant::Wager));
        controller.tap(None, Some(Animal::Crab.position()));
        for zone in [1, 1, 1] {
            controller.tap(Some(zone), None);
        }

        // the roll button sits in the center zone
        controller.roll();
        controller.zone_tap(Some(2));
        controller.zone_tap(Some(2));

        assert!(controller.snapshot().favor_active);
        assert_eq!(controller.snapshot().phase, Phase::Rolling);
    }

    #[test]
    fn notices_become_toasts_capped() {
        let mut controller = AppController::new(&config(Variant::Wager));
        for _ in 0..(MAX_TOASTS + 2) {
            controller.roll();
        }
        controller.pump();
        let snap = controller.snapshot();
        assert_eq!(snap.toasts.len(), MAX_TOASTS);
        assert!(snap.toasts.iter().all(|n| *n == Notice::NoBetPlaced));
    }

    #[test]
    fn free_table_ignores_zones() {
        let mut controller = AppController::new(&config(Variant::Free));
        controller.tap(Some(1), None);
        assert!(controller.pump().is_empty());
    }
}
