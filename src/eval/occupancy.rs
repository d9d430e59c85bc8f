use analyzer_lib::trace::parser;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let param_tokens: Vec<String> = std::env::args().collect();
    let trace_path = param_tokens
        .get(1)
        .ok_or("You should specify exactly one trace file")?;

    let entries = parser::parse_trace_file(trace_path)?;
    if entries.is_empty() {
        return Err(format!("No trace entries found in {}", trace_path).into());
    }

    // Busy-register population count per display cycle
    let data: Vec<(i32, f64)> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| (i as i32, e.scoreboard.busy_vec.count_ones() as f64))
        .collect();
    let y_max = data.iter().map(|(_, y)| *y).fold(1.0, f64::max);

    // Plot the data
    use plotters::prelude::*;

    let trace_base_name = String::from(trace_path.split('/').last().unwrap());
    let plot_title =
        format!("Busy-register occupancy: {}", trace_base_name);
    std::fs::create_dir_all("eval")?;
    let output_path = format!("eval/occupancy_{}.svg", trace_base_name);

    let root =
        SVGBackend::new(output_path.as_str(), (800, 600)).into_drawing_area();
    root.fill(&WHITE).unwrap();

    let mut ctx = ChartBuilder::on(&root)
        .caption(plot_title.as_str(), ("sans-serif", 40).into_font())
        .margin(5)
        .x_label_area_size(40)
        .y_label_area_size(40)
        .build_cartesian_2d(0..entries.len() as i32, 0.0..y_max * 1.1)
        .unwrap();
    ctx.configure_mesh()
        .x_desc("Cycle")
        .y_desc("Busy registers")
        .draw()
        .unwrap();

    ctx.draw_series(LineSeries::new(data, Palette99::pick(0).to_rgba()))
        .unwrap();

    Ok(())
}
