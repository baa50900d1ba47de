//! Audio feature heatmap.
//!
//! The ranked tracks are reshaped into a feature × track matrix and
//! described as a Plotly figure. Drawing is left to Plotly.js in the
//! browser; this module only produces the `<div>` and the `newPlot` call
//! that goes with it.

use serde::Serialize;

use crate::{
    types::{Feature, TopTracks},
    utils,
};

pub const HEIGHT: u32 = 625;

const TOP_MARGIN: u32 = 125;
const GRID_COLOR: &str = "rgba(255,255,255,0.3)";
const TRANSPARENT: &str = "rgba(0,0,0,0)";
const TEXT_COLOR: &str = "white";
const COVER_Y: f64 = 1.075;
const COVER_SIZE: f64 = 0.6;

/// CARTO "Sunset", light to dark.
const SUNSET: [&str; 7] = [
    "rgb(243, 231, 155)",
    "rgb(250, 196, 132)",
    "rgb(248, 160, 126)",
    "rgb(235, 127, 134)",
    "rgb(206, 102, 147)",
    "rgb(160, 89, 160)",
    "rgb(92, 83, 165)",
];

/// Feature × track values. Rows follow [`Feature::ALL`], columns follow
/// the track ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapMatrix {
    pub rows: Vec<&'static str>,
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl HeatmapMatrix {
    pub fn from_result(result: &TopTracks) -> Self {
        let values: Vec<Vec<f64>> = Feature::ALL
            .iter()
            .map(|&feature| result.features().iter().map(|f| f.get(feature)).collect())
            .collect();

        Self {
            rows: Feature::ALL.iter().map(|f| f.label()).collect(),
            columns: result.tracks().iter().map(|t| t.name.clone()).collect(),
            values,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Smallest and largest value in the matrix, `None` when it has no
    /// columns.
    pub fn range(&self) -> Option<(f64, f64)> {
        self.values.iter().flatten().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<HeatmapTrace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeatmapTrace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub z: Vec<Vec<f64>>,
    /// Column positions. Track names only appear as tick labels so two
    /// tracks with the same name still get their own column.
    pub x: Vec<usize>,
    pub y: Vec<&'static str>,
    pub customdata: Vec<Vec<String>>,
    pub hovertemplate: &'static str,
    pub coloraxis: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub coloraxis: ColorAxis,
    pub plot_bgcolor: &'static str,
    pub paper_bgcolor: &'static str,
    pub font: Font,
    pub title: Title,
    pub height: u32,
    pub margin: Margin,
    pub images: Vec<LayoutImage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Axis {
    pub title: Text,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickmode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickvals: Option<Vec<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticktext: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autorange: Option<&'static str>,
    pub showline: bool,
    pub gridcolor: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColorAxis {
    pub colorscale: Vec<(f64, &'static str)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmin: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmax: Option<f64>,
    pub colorbar: ColorBar,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColorBar {
    pub title: Text,
}

#[derive(Debug, Clone, Serialize)]
pub struct Text {
    pub text: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Font {
    pub color: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Title {
    pub font: Font,
}

#[derive(Debug, Clone, Serialize)]
pub struct Margin {
    pub t: u32,
}

/// An album cover pinned above its column, just outside the plot area.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutImage {
    pub source: String,
    pub xref: &'static str,
    pub yref: &'static str,
    pub x: usize,
    pub y: f64,
    pub sizex: f64,
    pub sizey: f64,
    pub xanchor: &'static str,
    pub yanchor: &'static str,
}

/// Builds the Plotly figure for `result`.
pub fn figure(result: &TopTracks) -> Figure {
    let matrix = HeatmapMatrix::from_result(result);
    let positions: Vec<usize> = (0..matrix.column_count()).collect();
    let range = matrix.range();

    let customdata: Vec<Vec<String>> = matrix
        .rows
        .iter()
        .map(|_| matrix.columns.clone())
        .collect();

    let images: Vec<LayoutImage> = result
        .tracks()
        .iter()
        .enumerate()
        .filter_map(|(i, track)| {
            track.album_cover_url.as_ref().map(|url| LayoutImage {
                source: url.clone(),
                xref: "x",
                yref: "paper",
                x: i,
                y: COVER_Y,
                sizex: COVER_SIZE,
                sizey: COVER_SIZE,
                xanchor: "center",
                yanchor: "bottom",
            })
        })
        .collect();

    let last = (SUNSET.len() - 1) as f64;
    let colorscale: Vec<(f64, &'static str)> = SUNSET
        .iter()
        .enumerate()
        .map(|(i, &color)| (i as f64 / last, color))
        .collect();

    let trace = HeatmapTrace {
        kind: "heatmap",
        z: matrix.values,
        x: positions.clone(),
        y: matrix.rows,
        customdata,
        hovertemplate: "Track Name: %{customdata}<br>Audio Feature: %{y}<br>Value: %{z}<extra></extra>",
        coloraxis: "coloraxis",
    };

    let layout = Layout {
        xaxis: Axis {
            title: Text { text: "Track Name" },
            tickmode: Some("array"),
            tickvals: Some(positions),
            ticktext: Some(matrix.columns),
            autorange: None,
            showline: false,
            gridcolor: GRID_COLOR,
        },
        yaxis: Axis {
            title: Text {
                text: "Audio Feature",
            },
            tickmode: None,
            tickvals: None,
            ticktext: None,
            autorange: Some("reversed"),
            showline: false,
            gridcolor: GRID_COLOR,
        },
        coloraxis: ColorAxis {
            colorscale,
            cmin: range.map(|(lo, _)| lo),
            cmax: range.map(|(_, hi)| hi),
            colorbar: ColorBar {
                title: Text { text: "Value" },
            },
        },
        plot_bgcolor: TRANSPARENT,
        paper_bgcolor: TRANSPARENT,
        font: Font {
            color: TEXT_COLOR,
            size: None,
            family: None,
        },
        title: Title {
            font: Font {
                color: TEXT_COLOR,
                size: Some(24),
                family: Some("Raleway"),
            },
        },
        height: HEIGHT,
        margin: Margin { t: TOP_MARGIN },
        images,
    };

    Figure {
        data: vec![trace],
        layout,
    }
}

/// Renders `result` as an embeddable heatmap: a container `<div>` with a
/// fresh id and the script that plots into it. The page must load
/// Plotly.js.
pub fn render(result: &TopTracks) -> Result<String, serde_json::Error> {
    let fig = figure(result);
    let div_id = format!("heatmap-{}", utils::generate_id(12));
    let data = script_json(&fig.data)?;
    let layout = script_json(&fig.layout)?;

    Ok(format!(
        r#"<div id="{div_id}" class="plotly-graph-div" style="height:{HEIGHT}px; width:100%;"></div>
<script type="text/javascript">
    if (document.getElementById("{div_id}")) {{
        Plotly.newPlot("{div_id}", {data}, {layout}, {{"responsive": true, "displaylogo": false}});
    }}
</script>"#
    ))
}

/// JSON that is safe to inline into a `<script>` element.
fn script_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}
