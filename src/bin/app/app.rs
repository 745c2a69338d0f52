use std::time::Duration;

use clap::{Parser, Subcommand};
use derive_more::Display;
use log::{error, info};

use hamres::io::{read_expected, read_instances, write_results, ResultRecord};
use hamres::timing::{merge_files, timed_repeat, TimingEntry, TimingStore};
use hamres::{DecideOpts, Method, ResolvingInstance};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[command(subcommand)]
    command: Cmd,

    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Decide every instance in a tab-separated batch file.
    Check {
        #[arg(long, default_value = "check-res-sets.tsv")]
        input: String,

        #[arg(long, default_value = "check-res-results.tsv")]
        output: String,

        #[arg(long, value_enum, default_value_t = Method::ParallelGroebner)]
        method: Method,

        #[arg(long, default_value_t = 100_000)]
        dict_size: usize,

        #[arg(long, default_value_t = 100_000)]
        scan_size: usize,

        #[arg(long, default_value_t = 1)]
        procs: usize,
    },

    /// Replay curated reference data and halt at the first wrong verdict.
    Test {
        #[arg(long, default_value = "data/res-sets.tsv")]
        data: String,

        #[arg(long, value_enum, default_value_t = Method::ParallelGroebner)]
        method: Method,

        /// Skip instances with more than this many variables.
        #[arg(long, default_value_t = 25)]
        limit: usize,

        #[arg(long, default_value_t = 100_000)]
        dict_size: usize,

        #[arg(long, default_value_t = 100_000)]
        scan_size: usize,

        #[arg(long, default_value_t = 1)]
        procs: usize,
    },

    /// Time one instance and append the measurement to a timing store.
    Bench {
        /// The candidate set, comma-separated.
        r: String,

        #[arg(long)]
        k: usize,

        #[arg(long)]
        a: usize,

        #[arg(long, value_enum, default_value_t = Method::ParallelGroebner)]
        method: Method,

        #[arg(long, default_value = "timings.json")]
        store: String,

        /// Repeat until this many seconds have elapsed in total.
        #[arg(long, default_value_t = 2.0)]
        min_secs: f64,

        #[arg(long, default_value_t = 100_000)]
        dict_size: usize,

        #[arg(long, default_value_t = 100_000)]
        scan_size: usize,

        #[arg(long, default_value_t = 1)]
        procs: usize,
    },

    /// Merge timing stores from separate runs into one file.
    Combine {
        inputs: Vec<String>,

        #[arg(long, default_value = "timings.json")]
        output: String,
    },
}

#[derive(Debug, Display)]
pub struct AppErr(pub(crate) String);
impl std::error::Error for AppErr {}

macro_rules! err {
    ($($arg:tt)*) => {{
        let msg = format!($($arg)*);
        let e = AppErr(msg);
        std::result::Result::Err(e.into())
    }}
}

pub(crate) use err;

pub struct App {
    args: CliArgs,
}

impl App {
    pub fn new() -> Self {
        let args = CliArgs::parse();
        if args.debug {
            Self::init_logger();
        }
        App { args }
    }

    fn init_logger() {
        use simplelog::*;
        TermLogger::init(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        )
        .unwrap()
    }

    pub fn run(&self) -> Result<String, i32> {
        info!("args: {:?}", self.args);

        let (res, time) = measure(|| guard_panic(|| self.dispatch()));

        let res = res.map_err(|e| {
            error!("{}", e);
            eprintln!("\x1b[0;31merror\x1b[0m: {e}");
            1 // error code
        });

        info!("time: {:?}", time);

        res
    }

    fn dispatch(&self) -> Result<String, Box<dyn std::error::Error>> {
        match &self.args.command {
            Cmd::Check { input, output, method, dict_size, scan_size, procs } => {
                let opts = DecideOpts { dict_size: *dict_size, scan_size: *scan_size };
                init_procs(*procs);
                self.check(input, output, *method, &opts)
            }
            Cmd::Test { data, method, limit, dict_size, scan_size, procs } => {
                let opts = DecideOpts { dict_size: *dict_size, scan_size: *scan_size };
                init_procs(*procs);
                self.test(data, *method, *limit, &opts)
            }
            Cmd::Bench { r, k, a, method, store, min_secs, dict_size, scan_size, procs } => {
                let opts = DecideOpts { dict_size: *dict_size, scan_size: *scan_size };
                init_procs(*procs);
                self.bench(r, *k, *a, *method, store, *min_secs, &opts)
            }
            Cmd::Combine { inputs, output } => {
                merge_files(inputs, output)?;
                Ok(format!("merged {} stores into {output}", inputs.len()))
            }
        }
    }

    fn check(
        &self,
        input: &str,
        output: &str,
        method: Method,
        opts: &DecideOpts,
    ) -> Result<String, Box<dyn std::error::Error>> {
        let records = read_instances(input)?;
        info!("{}: {} instances", input, records.len());

        let mut results = vec![];
        for rec in &records {
            let inst = rec.instance()?;
            let v = method.decide(&inst, opts);
            info!("{inst}: resolving = {}", v.resolving);
            results.push(ResultRecord::new(rec, &v));
        }

        write_results(output, &results)?;
        Ok(format!("{} verdicts written to {output}", results.len()))
    }

    fn test(
        &self,
        data: &str,
        method: Method,
        limit: usize,
        opts: &DecideOpts,
    ) -> Result<String, Box<dyn std::error::Error>> {
        let records = read_expected(data)?;
        let (mut run, mut skipped) = (0, 0);

        for rec in &records {
            let inst = rec.instance()?;
            if inst.arity() > limit {
                info!("skip {inst}: {} variables", inst.arity());
                skipped += 1;
                continue;
            }

            let v = method.decide(&inst, opts);
            if v.resolving != rec.resolving {
                return err!(
                    "{inst}: {} says {}, expected {}",
                    method.name(),
                    v.resolving,
                    rec.resolving
                );
            }
            info!("ok {inst}: resolving = {}", v.resolving);
            run += 1;
        }

        Ok(format!("{run} instances verified, {skipped} skipped"))
    }

    #[allow(clippy::too_many_arguments)]
    fn bench(
        &self,
        r: &str,
        k: usize,
        a: usize,
        method: Method,
        store_path: &str,
        min_secs: f64,
        opts: &DecideOpts,
    ) -> Result<String, Box<dyn std::error::Error>> {
        let r: Vec<String> = r.split(',').map(|s| s.to_string()).collect();
        let inst = ResolvingInstance::new(r, k, a, None)?;

        let min = Duration::from_secs_f64(min_secs);
        let (v, mean, runs) = timed_repeat(min, || method.decide(&inst, opts));
        info!("{inst}: {runs} runs, mean {mean:?}");

        let mut store = TimingStore::load(store_path)?;
        info!(
            "{} prior entries for {} (a={a}, k={k})",
            store.count_for(method.name(), a, k),
            method.name()
        );
        store.record(
            method.name(),
            a,
            k,
            TimingEntry {
                r: inst.r().to_vec(),
                resolving: v.resolving,
                elapsed: mean.as_secs_f64(),
            },
        );
        store.save(store_path)?;

        Ok(format!(
            "{inst}: resolving = {}, mean {mean:?} over {runs} runs",
            v.resolving
        ))
    }
}

fn measure<F, Res>(proc: F) -> (Res, std::time::Duration)
where
    F: FnOnce() -> Res,
{
    let start = std::time::Instant::now();
    let res = proc();
    let time = start.elapsed();
    (res, time)
}

fn guard_panic<F, R>(f: F) -> Result<R, Box<dyn std::error::Error>>
where
    F: FnOnce() -> Result<R, Box<dyn std::error::Error>> + std::panic::UnwindSafe,
{
    std::panic::catch_unwind(f).unwrap_or_else(|e| {
        let info = match e.downcast::<String>() {
            Ok(v) => *v,
            Err(e) => match e.downcast::<&str>() {
                Ok(v) => v.to_string(),
                _ => "Unknown Source of Error".to_owned(),
            },
        };
        err!("panic: {info}")
    })
}

cfg_if::cfg_if! {
    if #[cfg(feature = "multithread")] {
        fn init_procs(procs: usize) {
            if let Err(e) = rayon::ThreadPoolBuilder::new()
                .num_threads(procs.max(1))
                .build_global()
            {
                error!("thread pool init: {e}");
            }
        }
    } else {
        fn init_procs(_procs: usize) {}
    }
}
