use colored::*;
use tracing::level_filters::LevelFilter;
use tracing::{Event, Level, Subscriber};
use tracing_indicatif::IndicatifLayer;
use tracing_indicatif::filter::IndicatifFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::fmt::{self as tracing_fmt, FmtContext, FormatEvent};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;

/// Target used by [`crate::terminal::print`] for undecorated output.
pub const PRINT_TARGET: &str = "ioskit::print";

pub struct IoskitFormatter;

impl<S, N> FormatEvent<S, N> for IoskitFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();

        if meta.target() != PRINT_TARGET {
            let (symbol, color_func): (&str, fn(ColoredString) -> ColoredString) =
                match *meta.level() {
                    Level::TRACE => ("[ ]", |s| s.dimmed()),
                    Level::DEBUG => ("[?]", |s| s.blue()),
                    Level::INFO => ("[+]", |s| s.green().bold()),
                    Level::WARN => ("[*]", |s| s.yellow().bold()),
                    Level::ERROR => ("[-]", |s| s.red().bold()),
                };
            write!(writer, "{} ", color_func(symbol.into()))?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// `RUST_LOG` wins over `verbose`. Undecorated output stays visible at
/// every quiet level.
pub fn env_filter(verbose: bool, quiet: u8) -> anyhow::Result<EnvFilter> {
    let default_level = match (verbose, quiet) {
        (true, _) => LevelFilter::DEBUG,
        (false, 0) => LevelFilter::INFO,
        (false, _) => LevelFilter::WARN,
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy()
        .add_directive(format!("{PRINT_TARGET}=info").parse()?)
        .add_directive("russh=warn".parse()?);
    Ok(env_filter)
}

pub fn init(verbose: bool, quiet: u8) -> anyhow::Result<()> {
    let env_filter = env_filter(verbose, quiet)?;
    let indicatif_layer = IndicatifLayer::new();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_fmt::layer()
                .event_format(IoskitFormatter)
                .with_writer(indicatif_layer.get_stderr_writer()),
        )
        .with(indicatif_layer.with_filter(IndicatifFilter::new(false)))
        .init();

    Ok(())
}
