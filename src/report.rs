//! Renders a planned route for people (text) and for map front ends (overlay).
//! Both walk `PlannedRoute::stops()`, so a label can never name a different
//! address than the marker it is attached to.

use std::io::{self, Write};

use route_opt_core::PlannedRoute;

pub fn write_text<W: Write>(out: &mut W, planned: &PlannedRoute) -> io::Result<()> {
    writeln!(out, "Optimized route:")?;
    for stop in planned.stops() {
        let address = &stop.location.address;
        match stop.leg {
            None => writeln!(out, "{}. {address} - Starting point", stop.position)?,
            Some(leg) => writeln!(
                out,
                "{}. {address} - Distance from previous location: {:.2} km",
                stop.position, leg.distance
            )?,
        }
    }
    writeln!(out, "Total distance: {:.2} km", planned.total())
}

/// Tab separated records:
///
/// ```text
/// marker  <pos>  <lat,lng>  <from> to <to>: <km> km
/// segment <pos>  <lat,lng>  <lat,lng>  <km>
/// ```
///
/// Every stop but the last gets a marker whose popup describes the leg
/// leaving it; the last stop gets a bare marker.
pub fn write_overlay<W: Write>(out: &mut W, planned: &PlannedRoute) -> io::Result<()> {
    let stops: Vec<_> = planned.stops().collect();

    for pair in stops.windows(2) {
        let (from, to) = (&pair[0], &pair[1]);
        let distance = to.leg.map_or(0.0, |leg| leg.distance);
        writeln!(
            out,
            "marker\t{}\t{}\t{} to {}: {distance:.2} km",
            from.position,
            from.location.coordinate,
            from.location.address,
            to.location.address
        )?;
        writeln!(
            out,
            "segment\t{}\t{}\t{}\t{distance:.2}",
            from.position,
            from.location.coordinate,
            to.location.coordinate
        )?;
    }

    if let Some(last) = stops.last() {
        writeln!(
            out,
            "marker\t{}\t{}\t",
            last.position,
            last.location.coordinate
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use route_opt_core::{Coordinate, Location, PlannedRoute, SolverConfig, plan_route};

    use super::{write_overlay, write_text};

    fn planned() -> PlannedRoute {
        plan_route(
            vec![
                Location::new("Depot".into(), Coordinate::new(0.0, 0.0)),
                Location::new("Far".into(), Coordinate::new(0.0, 2.0)),
                Location::new("Near".into(), Coordinate::new(0.0, 1.0)),
            ],
            &SolverConfig::unbounded(),
        )
        .expect("plan")
    }

    fn render(f: impl Fn(&mut Vec<u8>, &PlannedRoute) -> std::io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf, &planned()).expect("render");
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn text_lists_stops_in_route_order() {
        let text = render(|out, p| write_text(out, p));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[1], "0. Depot - Starting point");
        assert_eq!(lines[2], "1. Near - Distance from previous location: 111.19 km");
        assert_eq!(lines[3], "2. Far - Distance from previous location: 111.19 km");
        assert_eq!(lines[4], "Total distance: 222.39 km");
    }

    #[test]
    fn single_stop_report_has_a_positive_zero_total() {
        let planned = plan_route(
            vec![Location::new("Home".into(), Coordinate::new(40.0, -75.0))],
            &SolverConfig::default(),
        )
        .expect("plan");
        let mut buf = Vec::new();
        write_text(&mut buf, &planned).expect("render");
        let text = String::from_utf8(buf).expect("utf8");

        assert_eq!(
            text.lines().collect::<Vec<_>>(),
            vec![
                "Optimized route:",
                "0. Home - Starting point",
                "Total distance: 0.00 km"
            ]
        );
        assert!(planned.total().is_sign_positive());
    }

    #[test]
    fn overlay_popups_match_segment_endpoints() {
        let text = render(|out, p| write_overlay(out, p));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "marker\t0\t0.0,0.0\tDepot to Near: 111.19 km");
        assert_eq!(lines[1], "segment\t0\t0.0,0.0\t0.0,1.0\t111.19");
        assert_eq!(lines[2], "marker\t1\t0.0,1.0\tNear to Far: 111.19 km");
        assert_eq!(lines[3], "segment\t1\t0.0,1.0\t0.0,2.0\t111.19");
        assert_eq!(lines[4], "marker\t2\t0.0,2.0\t");
    }
}
