use crate::types::report::{ComparisonReport, Output, RouteDetail, RoutePage, UpsertSummary};

pub fn to_markdown(output: &Output) -> String {
    match output {
        Output::Upsert(summary) => upsert_markdown(summary),
        Output::Detail(detail) => detail_markdown(detail),
        Output::Page(page) => page_markdown(page),
        Output::Comparison(report) => comparison_markdown(report),
    }
}

fn upsert_markdown(summary: &UpsertSummary) -> String {
    format!(
        "Route {} {} (final score {:.3})\n",
        summary.route_id,
        if summary.created { "created" } else { "updated" },
        summary.final_score
    )
}

fn detail_markdown(detail: &RouteDetail) -> String {
    let mut output = String::new();
    output.push_str(&format!("# Route {}\n\n", detail.route_id));
    output.push_str(&format!(
        "- from: {}\n- to: {}\n- active: {}\n",
        detail.source, detail.destination, detail.is_active
    ));
    if let Some([lng, lat]) = detail.source_coords {
        output.push_str(&format!("- source point: {lng}, {lat}\n"));
    }
    if let Some([lng, lat]) = detail.destination_coords {
        output.push_str(&format!("- destination point: {lng}, {lat}\n"));
    }
    if let (Some(path), Some(length)) = (&detail.route_geometry, detail.length_m) {
        output.push_str(&format!(
            "- geometry: {} points, {:.0} m\n",
            path.len(),
            length
        ));
    }
    output.push_str(&format!(
        "- created: {}\n- updated: {}\n\n",
        detail.created_at.to_rfc3339(),
        detail.updated_at.to_rfc3339()
    ));

    output.push_str("## Scores\n\n");
    output.push_str(&format!(
        "- traffic: {:.3}\n- crime: {:.3}\n- weather: {:.3}\n- final: {:.3}\n",
        detail.traffic_score, detail.crime_score, detail.weather_score, detail.final_score
    ));
    output
}

fn page_markdown(page: &RoutePage) -> String {
    let mut output = String::new();
    output.push_str(&format!("# Routes (page {}, limit {})\n\n", page.page, page.limit));
    if page.routes.is_empty() {
        output.push_str("- none\n");
        return output;
    }
    for route in &page.routes {
        output.push_str(&format!(
            "- {}: {} -> {} (final score {:.3}, created {})\n",
            route.route_id,
            route.source,
            route.destination,
            route.final_score,
            route.created_at.to_rfc3339()
        ));
    }
    output
}

fn comparison_markdown(report: &ComparisonReport) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "# {} -> {}\n\n",
        report.source, report.destination
    ));
    output.push_str(&format!(
        "Safest: {}\nRiskiest: {}\n\n",
        report.safest_route_id, report.riskiest_route_id
    ));
    output.push_str("## Ranking\n\n");
    for (rank, route) in report.routes.iter().enumerate() {
        output.push_str(&format!(
            "{}. {} (final {:.3}; traffic {:.3}, crime {:.3}, weather {:.3})\n",
            rank + 1,
            route.route_id,
            route.final_score,
            route.traffic_score,
            route.crime_score,
            route.weather_score
        ));
    }
    output
}
