mod report;

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    time::Instant,
};

use log::info;

use route_opt_core::{
    OutputFormat, Result, RouteInput, SolverOptions,
    geocode::{Gazetteer, Geocoder, InlineGeocoder, NominatimGeocoder, resolve_locations},
    interrupt, logging, plan_route,
};

fn main() -> Result<()> {
    let now = Instant::now();
    let options = SolverOptions::from_args()?;
    logging::init_logger(&options)?;
    info!("options: {options}");

    let input = RouteInput::read(options.input_path(), options.origin.as_deref())?;
    info!("input: addresses={} depot={:?}", input.len(), input.depot());

    let local = options
        .gazetteer_path()
        .map(Gazetteer::load)
        .transpose()?
        .unwrap_or_default()
        .or(InlineGeocoder);
    let locations = if options.nominatim {
        let online = NominatimGeocoder::connect(&options.nominatim_url)?;
        resolve_locations(&input.addresses, &local.or(online))?
    } else {
        resolve_locations(&input.addresses, &local)?
    };

    let config = options
        .solver_config()
        .with_cancel(interrupt::interrupt_flag());
    let planned = plan_route(locations, &config)?;

    let mut out: BufWriter<Box<dyn Write>> = BufWriter::new(match options.output_path() {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout().lock()),
    });
    match options.format {
        OutputFormat::Text => report::write_text(&mut out, &planned)?,
        OutputFormat::Overlay => report::write_overlay(&mut out, &planned)?,
    }
    out.flush()?;

    info!(
        "output: n={} total_km={:.2} stop={} time={:.2}s",
        planned.route().len(),
        planned.total(),
        planned.stop_reason(),
        now.elapsed().as_secs_f32()
    );

    Ok(())
}
