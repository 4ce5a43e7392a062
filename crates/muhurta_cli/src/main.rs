use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use muhurta_chart::{
    AspectMotion, Body, HouseCusps, InMemoryChartStore, MovingPoint, NatalChart, NatalChartStore,
    Sign, essential_dignity, sign_from_longitude,
};
use muhurta_config::{CONFIG_ENV_VAR, ConfigSource, LOCAL_CONFIG_FILE, MuhurtaConfig};
use muhurta_search::{AdviceError, AdviceRequest, TabulatedFeed, advise_at};
use muhurta_time::{UtcTime, jd_to_utc, local_sidereal_time_deg};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "muhurta", version, about = "Transit advisory engine CLI")]
struct Cli {
    /// Config file (default: $MUHURTA_CONFIG, then ./muhurta.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Julian Day of a UTC instant
    Jd {
        /// RFC 3339 timestamp or YYYY-MM-DD
        date: String,
    },
    /// UTC instant of a Julian Day
    Date {
        jd: f64,
    },
    /// Local sidereal time in degrees
    Lst {
        /// RFC 3339 timestamp or YYYY-MM-DD
        date: String,
        /// East longitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
    /// Zodiac sign of an ecliptic longitude
    Sign {
        #[arg(allow_hyphen_values = true)]
        lon: f64,
    },
    /// House of a longitude given 12 cusps
    House {
        #[arg(allow_hyphen_values = true)]
        lon: f64,
        /// Comma-separated cusp longitudes, house 1 first
        #[arg(long, required = true, value_delimiter = ',', allow_hyphen_values = true)]
        cusps: Vec<f64>,
    },
    /// Essential dignity of a body in a sign
    Dignity {
        body: String,
        sign: String,
    },
    /// Aspect between two longitudes
    Aspect {
        #[arg(allow_hyphen_values = true)]
        lon_a: f64,
        #[arg(allow_hyphen_values = true)]
        lon_b: f64,
        /// Daily speed of the first point (omit for a fixed point)
        #[arg(long, allow_hyphen_values = true)]
        speed_a: Option<f64>,
        /// Daily speed of the second point (omit for a fixed point)
        #[arg(long, allow_hyphen_values = true)]
        speed_b: Option<f64>,
    },
    /// Advisory for a date and topic, as JSON
    Advise {
        /// Natal chart JSON; with --user, a JSON object of user id → chart
        #[arg(long)]
        chart: PathBuf,
        #[arg(long)]
        user: Option<String>,
        /// Civil date, YYYY-MM-DD
        #[arg(long)]
        date: String,
        #[arg(long, default_value = "custom")]
        topic: String,
        /// IANA zone name, echoed in the result
        #[arg(long)]
        timezone: Option<String>,
        #[arg(long)]
        note: Option<String>,
        /// Tabulated ephemeris JSON (default: ephemeris_path from config)
        #[arg(long)]
        ephemeris: Option<PathBuf>,
        /// Fixed evaluatedAt (RFC 3339) for reproducible output
        #[arg(long)]
        evaluated_at: Option<String>,
        #[arg(long)]
        pretty: bool,
    },
    /// Print the effective configuration as TOML
    Config,
}

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(explicit: Option<&Path>) -> Result<(MuhurtaConfig, ConfigSource)> {
    match explicit {
        Some(path) => {
            let config = MuhurtaConfig::load_from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?;
            Ok((config, ConfigSource::Local(path.to_path_buf())))
        }
        None => {
            let env = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
            Ok(MuhurtaConfig::load_with_source(
                env.as_deref(),
                Path::new(LOCAL_CONFIG_FILE),
            ))
        }
    }
}

fn parse_instant(s: &str) -> Result<UtcTime> {
    s.parse::<UtcTime>()
        .with_context(|| format!("invalid date `{s}`"))
}

fn load_chart(path: &Path, user: Option<&str>) -> Result<NatalChart> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading chart {}", path.display()))?;
    let Some(user) = user else {
        return NatalChart::from_json(&text)
            .with_context(|| format!("parsing chart {}", path.display()));
    };
    let charts: HashMap<String, NatalChart> = serde_json::from_str(&text)
        .with_context(|| format!("parsing chart map {}", path.display()))?;
    let mut store = InMemoryChartStore::new();
    for (id, chart) in charts {
        store.insert(id, chart);
    }
    store.get(user).map_err(|e| {
        let e = AdviceError::from(e);
        error!(error = %e, "chart lookup failed");
        anyhow!(e.user_message().into_owned())
    })
}

fn format_sign(lon: f64) -> String {
    let pos = sign_from_longitude(lon);
    let dms = pos.dms;
    // seconds truncated to tenths
    let tenths = ((dms.seconds * 10.0).floor() as u16).min(599);
    format!(
        "{} {}°{:02}'{:02}.{}\" ({:.4} deg in sign)",
        pos.sign.name(),
        dms.degrees,
        dms.minutes,
        tenths / 10,
        tenths % 10,
        pos.degrees_in_sign
    )
}

fn point(lon: f64, speed: Option<f64>) -> MovingPoint {
    match speed {
        Some(s) => MovingPoint::moving(lon, s),
        None => MovingPoint::fixed(lon),
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Jd { date } => {
            let t = parse_instant(&date)?;
            println!("{:.6}", t.to_jd()?);
        }

        Commands::Date { jd } => {
            println!("{}", jd_to_utc(jd)?.to_iso_millis());
        }

        Commands::Lst { date, lon } => {
            let jd = parse_instant(&date)?.to_jd()?;
            println!("{:.6}", local_sidereal_time_deg(jd, lon)?);
        }

        Commands::Sign { lon } => {
            if !lon.is_finite() {
                bail!("longitude must be finite");
            }
            println!("{}", format_sign(lon));
        }

        Commands::House { lon, cusps } => {
            let cusps: [f64; 12] = cusps
                .try_into()
                .map_err(|v: Vec<f64>| anyhow!("expected 12 cusps, got {}", v.len()))?;
            let table = HouseCusps::new(cusps)?;
            let house = table.house_of(lon);
            let sign = table.cusp_sign(house).map_or("?", Sign::name);
            println!("House {house} (cusp in {sign})");
        }

        Commands::Dignity { body, sign } => {
            let body: Body = body.parse()?;
            let sign: Sign = sign.parse()?;
            println!("{} in {}: {}", body, sign, essential_dignity(body, sign).name());
        }

        Commands::Aspect {
            lon_a,
            lon_b,
            speed_a,
            speed_b,
        } => {
            let (config, _) = load_config(cli.config.as_deref())?;
            let table = config.aspect_table()?;
            match table.find(point(lon_a, speed_a), point(lon_b, speed_b)) {
                Some(m) => {
                    let motion = match m.motion {
                        AspectMotion::Applying => "applying",
                        AspectMotion::Separating => "separating",
                    };
                    println!(
                        "{} (separation {:.4}, orb {:.4} of {:.1}, strength {:.3}, {})",
                        m.kind, m.separation, m.orb, m.max_orb, m.strength, motion
                    );
                }
                None => println!("No aspect"),
            }
        }

        Commands::Advise {
            chart,
            user,
            date,
            topic,
            timezone,
            note,
            ephemeris,
            evaluated_at,
            pretty,
        } => {
            let (config, source) = load_config(cli.config.as_deref())?;
            info!(%source, "using config");

            let natal = load_chart(&chart, user.as_deref())?;
            let feed_path = ephemeris
                .or_else(|| config.ephemeris_path.clone())
                .ok_or_else(|| anyhow!("no ephemeris table: pass --ephemeris or set ephemeris_path"))?;
            let feed = TabulatedFeed::load(&feed_path)
                .with_context(|| format!("loading ephemeris {}", feed_path.display()))?;

            let catalog = config.topic_catalog()?;
            let settings = config.advice_settings(&catalog)?;
            let evaluated_at = match evaluated_at {
                Some(s) => DateTime::parse_from_rfc3339(&s)
                    .with_context(|| format!("invalid --evaluated-at `{s}`"))?
                    .with_timezone(&Utc),
                None => Utc::now(),
            };

            let mut request = AdviceRequest::new(date, topic);
            request.timezone = timezone;
            request.custom_note = note;

            let result = advise_at(&feed, &natal, &request, &settings, evaluated_at)
                .map_err(|e| {
                    error!(error = %e, "advice failed");
                    anyhow!(e.user_message().into_owned())
                })?;
            let json = if pretty {
                result.to_json_pretty()?
            } else {
                result.to_json()?
            };
            println!("{json}");
        }

        Commands::Config => {
            let (config, source) = load_config(cli.config.as_deref())?;
            println!("# source: {source}");
            print!("{}", config.to_toml()?);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_json);
    run(cli)
}
