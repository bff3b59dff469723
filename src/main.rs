use std::{sync::Arc, time::Duration};

use actix::Actor;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info, warn};
use widget_engine::{
    animation::{AnimationSpec, AnimationStatus, Easing, TriggerMode},
    counter::{
        messages::{Dispose as DisposeCard, Intersection},
        CounterCard,
    },
    env::Settings,
    live::{
        config::{BjjConfig, BjjMode, SyncConfig},
        messages::Dispose,
        source::HttpStatusSource,
        LiveSync,
    },
    persistence::WidgetStore,
    widget::{fetch_remote_values, CounterBoard},
    LoggerManager, WidgetResult,
};

#[derive(Parser)]
#[command(
    name = "widget_engine",                 // 프로그램 이름
    version = env!("CARGO_PKG_VERSION"),    // 버전
    about = env!("CARGO_PKG_DESCRIPTION"),  // 짧은 설명
    long_about = None,
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the live submission-bonus widget against its status endpoints.
    Live {
        #[arg(long)]
        status_url: Option<String>,
        #[arg(long)]
        fallback_url: Option<String>,
        /// RFC 3339 instant at which the widget ends.
        #[arg(long)]
        deadline: Option<DateTime<Utc>>,
        /// Start in fixed mode showing this attack.
        #[arg(long)]
        pinned: Option<String>,
    },
    /// Animate a single counter and print every rendered value.
    Count {
        #[arg(long, default_value_t = 0.0)]
        start: f64,
        #[arg(long)]
        end: f64,
        #[arg(long, default_value_t = 2000)]
        duration: i64,
        #[arg(long, value_enum, default_value_t = EasingArg::EaseOut)]
        easing: EasingArg,
        #[arg(long, default_value_t = 0)]
        decimals: u32,
        #[arg(long, default_value = "")]
        prefix: String,
        #[arg(long, default_value = "")]
        suffix: String,
    },
    /// Play every card of the stored counter widget.
    Board {
        /// Pull end values from the widget's remote API first.
        #[arg(long)]
        refresh: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum EasingArg {
    Linear,
    EaseOut,
    EaseInOut,
    Smooth,
}

impl From<EasingArg> for Easing {
    fn from(arg: EasingArg) -> Self {
        match arg {
            EasingArg::Linear => Easing::Linear,
            EasingArg::EaseOut => Easing::EaseOut,
            EasingArg::EaseInOut => Easing::EaseInOut,
            EasingArg::Smooth => Easing::Smooth,
        }
    }
}

#[actix::main]
async fn main() -> WidgetResult<()> {
    let args = Args::parse();

    // 1. 환경변수 로드
    dotenv::dotenv().ok();

    // 2. 설정 파일 로드
    let settings = Settings::new()?;

    // 3. 로거 초기화
    let _logger_manager = LoggerManager::setup(&settings);
    info!("Logger initialized");

    match args.command {
        Command::Live {
            status_url,
            fallback_url,
            deadline,
            pinned,
        } => {
            // 이벤트 모드는 지정한 공격 이름을 고정 표시로 시작한다
            let mut config = match pinned {
                Some(attack_name) => BjjConfig {
                    mode: BjjMode::Event,
                    attack_name,
                    ..BjjConfig::default()
                }
                .sync_config(&settings.sync),
                None => SyncConfig::from_settings(&settings.sync),
            };
            if let Some(url) = status_url {
                config.status_endpoint = url;
            }
            if let Some(url) = fallback_url {
                config.fallback_text_endpoint = url;
            }
            if deadline.is_some() {
                config.event_deadline = deadline;
            }
            run_live(config).await
        }
        Command::Count {
            start,
            end,
            duration,
            easing,
            decimals,
            prefix,
            suffix,
        } => {
            let spec = AnimationSpec {
                start_value: start,
                end_value: end,
                duration_ms: duration,
                easing: easing.into(),
                decimal_places: decimals,
                prefix,
                suffix,
                trigger_mode: TriggerMode::Immediate,
                visibility_threshold: 0.0,
            };
            run_count(spec, frame_interval(&settings)).await
        }
        Command::Board { refresh } => run_board(&settings, refresh).await,
    }
}

fn frame_interval(settings: &Settings) -> Duration {
    Duration::from_millis(settings.animation.frame_interval_ms)
}

async fn run_live(config: SyncConfig) -> WidgetResult<()> {
    let http_client = reqwest::Client::new();
    let source = Arc::new(HttpStatusSource::new(http_client, &config));
    let (addr, mut snapshots) = LiveSync::launch(config, source);
    info!("Live widget running. Press Ctrl+C to stop.");

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    warn!("Live widget stopped publishing");
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                info!(
                    mode = ?snapshot.mode,
                    connected = snapshot.is_connected,
                    label = %snapshot.event_label,
                    "{}",
                    snapshot.displayed_text
                );
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received. Disposing live widget...");
                addr.do_send(Dispose);
                break;
            }
        }
    }
    Ok(())
}

async fn run_count(spec: AnimationSpec, frame_interval: Duration) -> WidgetResult<()> {
    let (card, mut frames) = CounterCard::new("cli", spec, frame_interval);
    let addr = card.start();

    loop {
        let frame = frames.borrow_and_update().clone();
        println!("{}", frame.display_value);
        if frame.status == AnimationStatus::Complete {
            break;
        }
        if frames.changed().await.is_err() {
            break;
        }
    }
    addr.do_send(DisposeCard);
    Ok(())
}

async fn run_board(settings: &Settings, refresh: bool) -> WidgetResult<()> {
    let store = WidgetStore::new(&settings.storage.widget_file);
    let mut widget = store.load().await.unwrap_or_default();

    if refresh {
        match widget.api_url.clone() {
            Some(api_url) => {
                let http_client = reqwest::Client::new();
                match fetch_remote_values(&http_client, &api_url).await {
                    Ok(values) => {
                        let changed = widget.apply_remote_values(&values);
                        info!("Applied {} remote values from {}", changed, api_url);
                        if changed > 0 {
                            store.save(&widget).await?;
                        }
                    }
                    Err(e) => error!("Failed to refresh remote values: {}", e),
                }
            }
            None => warn!("Widget {} has no api_url, skipping refresh", widget.id),
        }
    }

    let board = CounterBoard::launch(&widget, frame_interval(settings));
    for (card_id, _) in board.frames() {
        if let Some(addr) = board.card(card_id) {
            // 터미널에는 뷰포트가 없으므로 모든 카드를 완전히 보이는 것으로 취급
            addr.do_send(Intersection { ratio: 1.0 });
        }
    }

    for (card_id, mut frames) in board.frames() {
        let finished = frames
            .wait_for(|frame| frame.status == AnimationStatus::Complete)
            .await
            .map(|frame| frame.display_value.clone());
        match finished {
            Ok(value) => println!("{card_id}: {value}"),
            Err(_) => warn!(card_id, "counter stopped before completing"),
        }
    }

    board.dispose();
    Ok(())
}
