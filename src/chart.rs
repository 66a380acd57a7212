//! SVG chart of call and put prices across strikes for one summary.

use plotters::prelude::*;
use std::path::Path;

use crate::error::{PricerError, PricerResult};
use crate::models::{types::OptionPricingRequest, utils::strike_grid};
use crate::report::PriceSummary;

/// Strikes span spot ± this fraction
const STRIKE_WIDTH: f64 = 0.3;
const CURVE_POINTS: usize = 121;

/// A priced point on the strike axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub strike: f64,
    pub call: f64,
    pub put: f64,
}

/// Price `base` at each strike in `strikes`, every other input held fixed.
pub fn price_curve(base: &OptionPricingRequest, strikes: &[f64]) -> PricerResult<Vec<CurvePoint>> {
    strikes
        .iter()
        .map(|&strike| -> PricerResult<CurvePoint> {
            let prices = OptionPricingRequest { strike, ..*base }.prices()?;
            Ok(CurvePoint {
                strike,
                call: prices.call,
                put: prices.put,
            })
        })
        .collect()
}

fn draw_err<E: std::fmt::Display>(e: E) -> PricerError {
    PricerError::Io(std::io::Error::other(e.to_string()))
}

/// Write the call/put price curve around spot to an SVG file.
pub fn render_price_curve(summary: &PriceSummary, path: &Path) -> PricerResult<()> {
    let strikes = strike_grid(summary.spot, STRIKE_WIDTH, CURVE_POINTS);
    let curve = price_curve(&summary.request(), &strikes)?;

    let x_min = strikes.first().copied().unwrap_or(summary.spot);
    let x_max = strikes.last().copied().unwrap_or(summary.spot);
    let y_max = curve
        .iter()
        .map(|p| p.call.max(p.put))
        .fold(0.0_f64, f64::max)
        .max(summary.call.max(summary.put))
        * 1.05
        + f64::EPSILON;

    let root = SVGBackend::new(path, (1280, 768)).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(
            format!(
                "{} | S=${:.2} σ={:.1}% r={:.2}% | {}d ({:.4}y)",
                summary.ticker,
                summary.spot,
                summary.sigma * 100.0,
                summary.rate * 100.0,
                summary.days_to_expiry,
                summary.years_to_exp
            ),
            ("sans-serif", 28),
        )
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max)
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .x_desc("Strike ($)")
        .y_desc("Option Price ($)")
        .draw()
        .map_err(draw_err)?;

    chart
        .draw_series(LineSeries::new(
            curve.iter().map(|p| (p.strike, p.call)),
            &RED,
        ))
        .map_err(draw_err)?
        .label("Call")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .draw_series(LineSeries::new(
            curve.iter().map(|p| (p.strike, p.put)),
            &BLUE,
        ))
        .map_err(draw_err)?
        .label("Put")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    // Requested strike
    chart
        .draw_series(vec![
            Circle::new((summary.strike, summary.call), 4, RED.filled()),
            Circle::new((summary.strike, summary.put), 4, BLUE.filled()),
        ])
        .map_err(draw_err)?;

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(draw_err)?;

    root.present().map_err(draw_err)?;
    tracing::info!(path = %path.display(), "price curve written");
    Ok(())
}
