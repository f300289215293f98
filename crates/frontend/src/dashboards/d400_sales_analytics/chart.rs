//! Геометрия графиков в координатах SVG viewBox.
//!
//! Раскладка считается чистой функцией `(вид графика, view model) -> ChartLayout`,
//! компонент панели только переводит её в элементы `<svg>`.

use super::view_model::ChartViewModel;
use crate::shared::format::format_compact;
use std::f64::consts::{FRAC_PI_2, TAU};

pub const VIEW_WIDTH: f64 = 600.0;
pub const VIEW_HEIGHT: f64 = 300.0;

const MARGIN_TOP: f64 = 16.0;
const MARGIN_RIGHT: f64 = 16.0;
const MARGIN_BOTTOM: f64 = 40.0;
const MARGIN_LEFT: f64 = 56.0;
/// Под длинные названия в ранжированных списках
const MARGIN_LEFT_HORIZONTAL: f64 = 150.0;
const TICK_COUNT: usize = 4;
/// Доля слота категории, занятая группой столбцов
const BAR_GROUP_FILL: f64 = 0.8;
const DOUGHNUT_HOLE: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Line,
    Bar,
    /// Ранжированные top-N списки с длинными подписями
    HorizontalBar,
    Pie,
    Doughnut,
}

impl ChartKind {
    pub fn is_radial(self) -> bool {
        matches!(self, ChartKind::Pie | ChartKind::Doughnut)
    }

    pub fn code(self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::HorizontalBar => "horizontal-bar",
            ChartKind::Pie => "pie",
            ChartKind::Doughnut => "doughnut",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabel {
    /// Координата вдоль своей оси
    pub position: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinePath {
    pub path: String,
    pub color: String,
    pub points: Vec<(f64, f64)>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartesianLayout {
    pub plot: PlotArea,
    pub horizontal: bool,
    pub value_ticks: Vec<AxisLabel>,
    pub categories: Vec<AxisLabel>,
    /// Положение нуля на оси значений
    pub baseline: f64,
    pub bars: Vec<BarRect>,
    pub lines: Vec<LinePath>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub path: String,
    pub color: String,
    pub label: String,
    pub value: f64,
    /// Доля от суммы, 0..=1
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadialLayout {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub inner_radius: f64,
    pub slices: Vec<Slice>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartLayout {
    /// Нет подписей или нечего рисовать: панель показывает заглушку
    Placeholder,
    Cartesian(CartesianLayout),
    Radial(RadialLayout),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

pub fn layout_chart(kind: ChartKind, vm: &ChartViewModel) -> ChartLayout {
    if vm.labels.is_empty() || vm.series.is_empty() {
        return ChartLayout::Placeholder;
    }
    let count = point_count(vm);
    if count == 0 {
        return ChartLayout::Placeholder;
    }
    match kind {
        ChartKind::Line => ChartLayout::Cartesian(vertical_layout(vm, count, false)),
        ChartKind::Bar => ChartLayout::Cartesian(vertical_layout(vm, count, true)),
        ChartKind::HorizontalBar => ChartLayout::Cartesian(horizontal_layout(vm, count)),
        ChartKind::Pie => radial_layout(vm, count, 0.0),
        ChartKind::Doughnut => radial_layout(vm, count, DOUGHNUT_HOLE),
    }
}

/// Легенда: для круговых по сегментам, для остальных по сериям
pub fn legend(kind: ChartKind, vm: &ChartViewModel) -> Vec<LegendEntry> {
    if kind.is_radial() {
        let Some(series) = vm.series.first() else {
            return Vec::new();
        };
        vm.labels
            .iter()
            .take(point_count(vm))
            .enumerate()
            .map(|(i, label)| LegendEntry {
                label: label.clone(),
                color: series.point_color(i).to_string(),
            })
            .collect()
    } else {
        vm.series
            .iter()
            .map(|s| LegendEntry {
                label: s.name.clone(),
                color: s.color.clone(),
            })
            .collect()
    }
}

/// Рисуется только общий префикс подписей и всех серий
fn point_count(vm: &ChartViewModel) -> usize {
    vm.series
        .iter()
        .map(|s| s.data.len())
        .fold(vm.labels.len(), usize::min)
}

/// Шкала значений, всегда включающая ноль
#[derive(Debug, Clone, Copy, PartialEq)]
struct ValueScale {
    min: f64,
    max: f64,
    step: f64,
}

impl ValueScale {
    fn from_values(values: impl Iterator<Item = f64>) -> Self {
        let (lo, hi) = values
            .filter(|v| v.is_finite())
            .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
        let hi = if hi - lo <= 0.0 { lo + 1.0 } else { hi };
        let step = nice_step((hi - lo) / TICK_COUNT as f64);
        Self {
            min: (lo / step).floor() * step,
            max: (hi / step).ceil() * step,
            step,
        }
    }

    fn fraction(&self, value: f64) -> f64 {
        let value = if value.is_finite() { value } else { 0.0 };
        (value - self.min) / (self.max - self.min)
    }

    fn ticks(&self) -> Vec<f64> {
        let steps = ((self.max - self.min) / self.step).round() as usize;
        (0..=steps).map(|i| self.min + self.step * i as f64).collect()
    }
}

/// Ближайший "круглый" шаг вида 1, 2, 5 × 10^n
fn nice_step(raw: f64) -> f64 {
    if !raw.is_finite() || raw <= 0.0 {
        return 1.0;
    }
    let magnitude = 10_f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

fn scale_for(vm: &ChartViewModel, count: usize) -> ValueScale {
    ValueScale::from_values(
        vm.series
            .iter()
            .flat_map(|s| s.data.iter().take(count).copied()),
    )
}

fn vertical_layout(vm: &ChartViewModel, count: usize, as_bars: bool) -> CartesianLayout {
    let plot = PlotArea {
        left: MARGIN_LEFT,
        top: MARGIN_TOP,
        right: VIEW_WIDTH - MARGIN_RIGHT,
        bottom: VIEW_HEIGHT - MARGIN_BOTTOM,
    };
    let scale = scale_for(vm, count);
    let y_of = |v: f64| plot.bottom - scale.fraction(v) * (plot.bottom - plot.top);
    let slot = (plot.right - plot.left) / count as f64;
    let center_of = |i: usize| plot.left + slot * (i as f64 + 0.5);
    let baseline = y_of(0.0);

    let mut bars = Vec::new();
    let mut lines = Vec::new();
    if as_bars {
        let bar_width = slot * BAR_GROUP_FILL / vm.series.len() as f64;
        for (s, series) in vm.series.iter().enumerate() {
            for (i, value) in series.data.iter().take(count).enumerate() {
                let y = y_of(*value);
                bars.push(BarRect {
                    x: plot.left + slot * i as f64 + slot * (1.0 - BAR_GROUP_FILL) / 2.0
                        + bar_width * s as f64,
                    y: y.min(baseline),
                    width: bar_width,
                    height: (y - baseline).abs(),
                    color: series.point_color(i).to_string(),
                    title: format!("{}: {}", vm.labels[i], format_compact(*value)),
                });
            }
        }
    } else {
        for series in &vm.series {
            let points: Vec<(f64, f64)> = series
                .data
                .iter()
                .take(count)
                .enumerate()
                .map(|(i, v)| (center_of(i), y_of(*v)))
                .collect();
            lines.push(LinePath {
                path: polyline_path(&points),
                color: series.color.clone(),
                points,
                name: series.name.clone(),
            });
        }
    }

    CartesianLayout {
        plot,
        horizontal: false,
        value_ticks: scale
            .ticks()
            .into_iter()
            .map(|t| AxisLabel {
                position: y_of(t),
                text: format_compact(t),
            })
            .collect(),
        categories: vm
            .labels
            .iter()
            .take(count)
            .enumerate()
            .map(|(i, label)| AxisLabel {
                position: center_of(i),
                text: label.clone(),
            })
            .collect(),
        baseline,
        bars,
        lines,
    }
}

fn horizontal_layout(vm: &ChartViewModel, count: usize) -> CartesianLayout {
    let plot = PlotArea {
        left: MARGIN_LEFT_HORIZONTAL,
        top: MARGIN_TOP,
        right: VIEW_WIDTH - MARGIN_RIGHT,
        bottom: VIEW_HEIGHT - MARGIN_BOTTOM,
    };
    let scale = scale_for(vm, count);
    let x_of = |v: f64| plot.left + scale.fraction(v) * (plot.right - plot.left);
    let slot = (plot.bottom - plot.top) / count as f64;
    let baseline = x_of(0.0);
    let bar_height = slot * BAR_GROUP_FILL / vm.series.len() as f64;

    let mut bars = Vec::new();
    for (s, series) in vm.series.iter().enumerate() {
        for (i, value) in series.data.iter().take(count).enumerate() {
            let x = x_of(*value);
            bars.push(BarRect {
                x: x.min(baseline),
                y: plot.top + slot * i as f64 + slot * (1.0 - BAR_GROUP_FILL) / 2.0
                    + bar_height * s as f64,
                width: (x - baseline).abs(),
                height: bar_height,
                color: series.point_color(i).to_string(),
                title: format!("{}: {}", vm.labels[i], format_compact(*value)),
            });
        }
    }

    CartesianLayout {
        plot,
        horizontal: true,
        value_ticks: scale
            .ticks()
            .into_iter()
            .map(|t| AxisLabel {
                position: x_of(t),
                text: format_compact(t),
            })
            .collect(),
        categories: vm
            .labels
            .iter()
            .take(count)
            .enumerate()
            .map(|(i, label)| AxisLabel {
                position: plot.top + slot * (i as f64 + 0.5),
                text: label.clone(),
            })
            .collect(),
        baseline,
        bars,
        lines: Vec::new(),
    }
}

/// Круговые графики строятся по первой серии; отрицательные значения не рисуются
fn radial_layout(vm: &ChartViewModel, count: usize, hole: f64) -> ChartLayout {
    let Some(series) = vm.series.first() else {
        return ChartLayout::Placeholder;
    };
    let values: Vec<f64> = series
        .data
        .iter()
        .take(count)
        .map(|v| if v.is_finite() { v.max(0.0) } else { 0.0 })
        .collect();
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        return ChartLayout::Placeholder;
    }

    let cx = VIEW_WIDTH / 2.0;
    let cy = VIEW_HEIGHT / 2.0;
    let radius = VIEW_HEIGHT / 2.0 - MARGIN_TOP;
    let inner_radius = radius * hole;

    let mut start = -FRAC_PI_2;
    let mut slices = Vec::new();
    for (i, value) in values.iter().enumerate() {
        if *value <= 0.0 {
            continue;
        }
        let share = value / total;
        let end = start + share * TAU;
        slices.push(Slice {
            path: arc_path(cx, cy, radius, inner_radius, start, end),
            color: series.point_color(i).to_string(),
            label: vm.labels[i].clone(),
            value: *value,
            share,
        });
        start = end;
    }

    ChartLayout::Radial(RadialLayout {
        cx,
        cy,
        radius,
        inner_radius,
        slices,
    })
}

fn polyline_path(points: &[(f64, f64)]) -> String {
    let mut path = String::new();
    for (i, (x, y)) in points.iter().enumerate() {
        let cmd = if i == 0 { "M" } else { " L" };
        path.push_str(&format!("{} {:.1},{:.1}", cmd, x, y));
    }
    path
}

fn point_on(cx: f64, cy: f64, r: f64, angle: f64) -> (f64, f64) {
    (cx + r * angle.cos(), cy + r * angle.sin())
}

fn circle_path(cx: f64, cy: f64, r: f64, sweep: u8) -> String {
    format!(
        "M {:.1},{:.1} A {:.1} {:.1} 0 1 {} {:.1},{:.1} A {:.1} {:.1} 0 1 {} {:.1},{:.1} Z",
        cx - r,
        cy,
        r,
        r,
        sweep,
        cx + r,
        cy,
        r,
        r,
        sweep,
        cx - r,
        cy
    )
}

/// Сектор (или кольцевой сегмент при `inner > 0`). Полный круг SVG-дугой
/// одной командой не рисуется, поэтому он собирается из двух половин.
fn arc_path(cx: f64, cy: f64, outer: f64, inner: f64, start: f64, end: f64) -> String {
    if end - start >= TAU - 1e-9 {
        let mut path = circle_path(cx, cy, outer, 1);
        if inner > 0.0 {
            path.push(' ');
            path.push_str(&circle_path(cx, cy, inner, 0));
        }
        return path;
    }

    let large = if end - start > std::f64::consts::PI { 1 } else { 0 };
    let (ox0, oy0) = point_on(cx, cy, outer, start);
    let (ox1, oy1) = point_on(cx, cy, outer, end);
    if inner > 0.0 {
        let (ix0, iy0) = point_on(cx, cy, inner, start);
        let (ix1, iy1) = point_on(cx, cy, inner, end);
        format!(
            "M {:.1},{:.1} A {:.1} {:.1} 0 {} 1 {:.1},{:.1} L {:.1},{:.1} A {:.1} {:.1} 0 {} 0 {:.1},{:.1} Z",
            ox0, oy0, outer, outer, large, ox1, oy1, ix1, iy1, inner, inner, large, ix0, iy0
        )
    } else {
        format!(
            "M {:.1},{:.1} L {:.1},{:.1} A {:.1} {:.1} 0 {} 1 {:.1},{:.1} Z",
            cx, cy, ox0, oy0, outer, outer, large, ox1, oy1
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::d400_sales_analytics::view_model::Series;

    fn vm(labels: &[&str], series: Vec<Series>) -> ChartViewModel {
        ChartViewModel {
            labels: labels.iter().map(|s| s.to_string()).collect(),
            series,
        }
    }

    #[test]
    fn test_empty_labels_render_placeholder_for_every_kind() {
        let empty = ChartViewModel::empty();
        for kind in [
            ChartKind::Line,
            ChartKind::Bar,
            ChartKind::HorizontalBar,
            ChartKind::Pie,
            ChartKind::Doughnut,
        ] {
            assert_eq!(layout_chart(kind, &empty), ChartLayout::Placeholder);
        }
    }

    #[test]
    fn test_mismatched_lengths_truncate_to_shortest() {
        let model = vm(
            &["W1", "W2", "W3"],
            vec![
                Series::new("a", vec![1.0, 2.0, 3.0], "#000000"),
                Series::new("b", vec![4.0, 5.0], "#ffffff"),
            ],
        );
        let ChartLayout::Cartesian(layout) = layout_chart(ChartKind::Line, &model) else {
            panic!("expected cartesian layout");
        };
        assert_eq!(layout.categories.len(), 2);
        assert!(layout.lines.iter().all(|l| l.points.len() == 2));
    }

    #[test]
    fn test_negative_bar_hangs_below_baseline() {
        let model = vm(&["up", "down"], vec![Series::new("g", vec![10.0, -5.0], "#000000")]);
        let ChartLayout::Cartesian(layout) = layout_chart(ChartKind::Bar, &model) else {
            panic!("expected cartesian layout");
        };
        let up = &layout.bars[0];
        let down = &layout.bars[1];
        assert!((up.y + up.height - layout.baseline).abs() < 1e-9);
        assert!((down.y - layout.baseline).abs() < 1e-9);
        assert!(down.height > 0.0);
    }

    #[test]
    fn test_value_ticks_include_zero() {
        let model = vm(&["a"], vec![Series::new("s", vec![1234.0], "#000000")]);
        let ChartLayout::Cartesian(layout) = layout_chart(ChartKind::HorizontalBar, &model) else {
            panic!("expected cartesian layout");
        };
        assert!(layout.horizontal);
        assert_eq!(layout.value_ticks[0].text, "0");
        assert!(layout.value_ticks.len() >= 2);
    }

    #[test]
    fn test_nice_step() {
        assert_eq!(nice_step(0.0), 1.0);
        assert_eq!(nice_step(3.0), 5.0);
        assert_eq!(nice_step(120.0), 200.0);
    }

    #[test]
    fn test_single_slice_is_full_circle() {
        let model = vm(&["only"], vec![Series::new("s", vec![42.0], "#000000")]);
        let ChartLayout::Radial(layout) = layout_chart(ChartKind::Doughnut, &model) else {
            panic!("expected radial layout");
        };
        assert_eq!(layout.slices.len(), 1);
        assert_eq!(layout.slices[0].share, 1.0);
        // внешняя и внутренняя окружности
        assert_eq!(layout.slices[0].path.matches('Z').count(), 2);
    }

    #[test]
    fn test_pie_shares_sum_to_one_and_skip_zero() {
        let model = vm(
            &["a", "b", "c"],
            vec![Series::new("s", vec![1.0, 0.0, 3.0], "#000000")],
        );
        let ChartLayout::Radial(layout) = layout_chart(ChartKind::Pie, &model) else {
            panic!("expected radial layout");
        };
        assert_eq!(layout.slices.len(), 2);
        let total: f64 = layout.slices.iter().map(|s| s.share).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert_eq!(layout.slices[1].label, "c");
    }

    #[test]
    fn test_all_zero_pie_is_placeholder() {
        let model = vm(&["a"], vec![Series::new("s", vec![0.0], "#000000")]);
        assert_eq!(layout_chart(ChartKind::Pie, &model), ChartLayout::Placeholder);
    }

    #[test]
    fn test_legend_per_kind() {
        let mut series = Series::new("Free Units", vec![1.0, 2.0], "#000000");
        series.point_colors = vec!["#111111".into(), "#222222".into()];
        let model = vm(&["x", "y"], vec![series]);

        let radial = legend(ChartKind::Pie, &model);
        assert_eq!(radial.len(), 2);
        assert_eq!(radial[1].color, "#222222");

        let bars = legend(ChartKind::Bar, &model);
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].label, "Free Units");
    }
}
