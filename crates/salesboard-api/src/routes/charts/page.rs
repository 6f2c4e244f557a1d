//! Chart rendering for the dashboard Charts tab

use salesboard_core::error::{DefaultErrorLogger, ErrorContext, ErrorLogger};
use salesboard_core::{ChartData, CoreResult, Metric};
use salesboard_utils::escape_html;

/// Chart.js canvases for each metric. Failed metrics get an inline notice.
pub fn render_charts(charts: &[(Metric, CoreResult<ChartData>)], year: i32) -> String {
    let mut html = format!(
        r#"<div class='mb-4 flex items-center gap-2'>
            <form action='/dashboard' method='get' class='flex items-center gap-2'>
                <label class='text-sm text-gray-600'>Year</label>
                <input type='number' name='year' value='{}' class='w-24 px-3 py-1 border rounded-lg'>
                <button type='submit' class='px-3 py-1 border rounded hover:bg-gray-100'>Show</button>
            </form>
        </div>
        <div class='grid grid-cols-1 lg:grid-cols-2 gap-6'>"#,
        year
    );
    let mut scripts = String::new();

    for (metric, result) in charts {
        let canvas_id = format!("chart-{}", metric);
        match result {
            Ok(chart) => {
                html.push_str(&format!(
                    r#"<div class='bg-white rounded-xl shadow-sm p-6'>
                    <h3 class='text-lg font-semibold mb-4'>{} ({})</h3>
                    <canvas id='{}'></canvas>
                </div>"#,
                    escape_html(&chart.title),
                    chart.year,
                    canvas_id
                ));
                match serde_json::to_string(chart) {
                    Ok(json) => scripts.push_str(&format!(
                        "drawChart('{}', {});\n",
                        canvas_id,
                        json.replace("</", "<\\/")
                    )),
                    Err(e) => log::error!("Failed to serialize {} chart: {}", metric, e),
                }
            }
            Err(e) => {
                let context = ErrorContext::new("render_charts")
                    .with_data("metric", serde_json::json!(metric.to_string()));
                DefaultErrorLogger.log_error(e, &context);
                html.push_str(&format!(
                    r#"<div class='bg-red-50 border border-red-200 text-red-700 rounded-xl p-6'>
                    <h3 class='text-lg font-semibold mb-2'>{}</h3>
                    <p class='text-sm'>Chart unavailable: {}</p>
                </div>"#,
                    metric.label(),
                    escape_html(&e.to_string())
                ));
            }
        }
    }
    html.push_str("</div>");

    html.push_str(&format!(
        r#"<script>
        function drawChart(id, chart) {{
            var ctx = document.getElementById(id);
            if (!ctx || typeof Chart === 'undefined') return;
            new Chart(ctx, {{
                type: chart.chart_type,
                data: {{
                    labels: chart.labels,
                    datasets: chart.datasets.map(function(d) {{
                        return {{ label: d.label, data: d.data, borderColor: d.border_color, fill: false }};
                    }})
                }},
                options: {{ responsive: true, scales: {{ y: {{ beginAtZero: true }} }} }}
            }});
        }}
        {}
        </script>"#,
        scripts
    ));
    html
}
