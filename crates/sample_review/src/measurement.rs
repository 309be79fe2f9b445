//! Measurement points, recorded readings and the two-column measurement grid.
//!
//! Readings are keyed by [`MeasurementPoint`] rather than by any display text,
//! so translating a label never changes where a value is stored.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Logical column a point is listed in on the form and in the report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    Left,
    Right,
}

/// A named physical dimension measured up to four times per sample.
///
/// "Sock Foam" is not a variant: it records an after/before pair, see
/// [`SockFoamReading`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementPoint {
    LastLength,
    ToeGirth,
    BallGirth,
    WaistGirth,
    InstepGirth,
    VampLength,
    BackHeight,
    BootHeight,
    BootTopWidth,
    BootCalfWidth,
    AnkleWidth,
    ToeWidth,
    BottomWidth,
    HeelSeatWidth,
    HeelToInstepGirth,
    ToeSpring,
    Thickness,
    Shank,
    MidSole,
    OutsoleDegree,
}

impl MeasurementPoint {
    pub const LEFT: [MeasurementPoint; 11] = [
        MeasurementPoint::LastLength,
        MeasurementPoint::ToeGirth,
        MeasurementPoint::BallGirth,
        MeasurementPoint::WaistGirth,
        MeasurementPoint::InstepGirth,
        MeasurementPoint::VampLength,
        MeasurementPoint::BackHeight,
        MeasurementPoint::BootHeight,
        MeasurementPoint::BootTopWidth,
        MeasurementPoint::BootCalfWidth,
        MeasurementPoint::AnkleWidth,
    ];

    pub const RIGHT: [MeasurementPoint; 9] = [
        MeasurementPoint::ToeWidth,
        MeasurementPoint::BottomWidth,
        MeasurementPoint::HeelSeatWidth,
        MeasurementPoint::HeelToInstepGirth,
        MeasurementPoint::ToeSpring,
        MeasurementPoint::Thickness,
        MeasurementPoint::Shank,
        MeasurementPoint::MidSole,
        MeasurementPoint::OutsoleDegree,
    ];

    /// Every four-reading point, left column first.
    pub fn all() -> impl Iterator<Item = MeasurementPoint> {
        Self::LEFT.into_iter().chain(Self::RIGHT)
    }

    pub fn column(self) -> Column {
        if Self::LEFT.contains(&self) {
            Column::Left
        } else {
            Column::Right
        }
    }

    /// Key used for the point in form files.
    pub fn key(self) -> &'static str {
        match self {
            MeasurementPoint::LastLength => "last_length",
            MeasurementPoint::ToeGirth => "toe_girth",
            MeasurementPoint::BallGirth => "ball_girth",
            MeasurementPoint::WaistGirth => "waist_girth",
            MeasurementPoint::InstepGirth => "instep_girth",
            MeasurementPoint::VampLength => "vamp_length",
            MeasurementPoint::BackHeight => "back_height",
            MeasurementPoint::BootHeight => "boot_height",
            MeasurementPoint::BootTopWidth => "boot_top_width",
            MeasurementPoint::BootCalfWidth => "boot_calf_width",
            MeasurementPoint::AnkleWidth => "ankle_width",
            MeasurementPoint::ToeWidth => "toe_width",
            MeasurementPoint::BottomWidth => "bottom_width",
            MeasurementPoint::HeelSeatWidth => "heel_seat_width",
            MeasurementPoint::HeelToInstepGirth => "heel_to_instep_girth",
            MeasurementPoint::ToeSpring => "toe_spring",
            MeasurementPoint::Thickness => "thickness",
            MeasurementPoint::Shank => "shank",
            MeasurementPoint::MidSole => "mid_sole",
            MeasurementPoint::OutsoleDegree => "outsole_degree",
        }
    }

    /// Canonical English name, also the source text for translation.
    pub fn english(self) -> &'static str {
        match self {
            MeasurementPoint::LastLength => "Last Length",
            MeasurementPoint::ToeGirth => "Toe Girth",
            MeasurementPoint::BallGirth => "Ball Girth",
            MeasurementPoint::WaistGirth => "Waist Girth",
            MeasurementPoint::InstepGirth => "Instep Girth",
            MeasurementPoint::VampLength => "Vamp length",
            MeasurementPoint::BackHeight => "Back Height",
            MeasurementPoint::BootHeight => "Boot Height",
            MeasurementPoint::BootTopWidth => "Boot top Width",
            MeasurementPoint::BootCalfWidth => "Boot Calf Width",
            MeasurementPoint::AnkleWidth => "Ankle Width",
            MeasurementPoint::ToeWidth => "Toe Width",
            MeasurementPoint::BottomWidth => "Bottom Width",
            MeasurementPoint::HeelSeatWidth => "Heel Seat Width",
            MeasurementPoint::HeelToInstepGirth => "Heel to Instep Girth",
            MeasurementPoint::ToeSpring => "Toe Spring",
            MeasurementPoint::Thickness => "Thickness",
            MeasurementPoint::Shank => "Shank",
            MeasurementPoint::MidSole => "Mid-sole",
            MeasurementPoint::OutsoleDegree => "Outsole Degree",
        }
    }

    pub fn mandarin(self) -> &'static str {
        match self {
            MeasurementPoint::LastLength => "楦长",
            MeasurementPoint::ToeGirth => "趾围",
            MeasurementPoint::BallGirth => "掌围",
            MeasurementPoint::WaistGirth => "腰围",
            MeasurementPoint::InstepGirth => "背围",
            MeasurementPoint::VampLength => "鞋口长度",
            MeasurementPoint::BackHeight => "后跟高度",
            MeasurementPoint::BootHeight => "靴筒高度",
            MeasurementPoint::BootTopWidth => "靴筒宽度",
            MeasurementPoint::BootCalfWidth => "小腿宽度",
            MeasurementPoint::AnkleWidth => "脚踝宽度",
            MeasurementPoint::ToeWidth => "趾宽",
            MeasurementPoint::BottomWidth => "掌宽",
            MeasurementPoint::HeelSeatWidth => "后跟宽度",
            MeasurementPoint::HeelToInstepGirth => "后跟到脚背长度",
            MeasurementPoint::ToeSpring => "鞋头翘度",
            MeasurementPoint::Thickness => "厚度",
            MeasurementPoint::Shank => "钢芯",
            MeasurementPoint::MidSole => "中底",
            MeasurementPoint::OutsoleDegree => "大底硬度",
        }
    }
}

/// English and Mandarin names of the after/before point.
pub const SOCK_FOAM_ENGLISH: &str = "Sock Foam";
pub const SOCK_FOAM_MANDARIN: &str = "鞋垫";

/// Up to four sequential readings of one point, stored as entered.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Readings {
    pub first: String,
    pub second: String,
    pub third: String,
    pub fourth: String,
}

impl Readings {
    pub fn new(
        first: impl Into<String>,
        second: impl Into<String>,
        third: impl Into<String>,
        fourth: impl Into<String>,
    ) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
            third: third.into(),
            fourth: fourth.into(),
        }
    }

    /// Readings in ordinal order.
    pub fn values(&self) -> [&str; 4] {
        [&self.first, &self.second, &self.third, &self.fourth]
    }

    pub fn is_blank(&self) -> bool {
        self.values().iter().all(|value| value.trim().is_empty())
    }
}

/// Sock foam thickness after and before pressing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SockFoamReading {
    pub after: String,
    pub before: String,
}

/// All readings entered for one sample.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MeasurementSheet {
    #[serde(rename = "measurements")]
    readings: BTreeMap<MeasurementPoint, Readings>,
    sock_foam: SockFoamReading,
}

impl MeasurementSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the readings of `point`, replacing earlier ones.
    pub fn set(&mut self, point: MeasurementPoint, readings: Readings) {
        self.readings.insert(point, readings);
    }

    /// Builder-style variant of [`MeasurementSheet::set`].
    pub fn with(mut self, point: MeasurementPoint, readings: Readings) -> Self {
        self.set(point, readings);
        self
    }

    /// Readings of `point`, or `None` when nothing was entered.
    pub fn get(&self, point: MeasurementPoint) -> Option<&Readings> {
        self.readings.get(&point)
    }

    pub fn sock_foam(&self) -> &SockFoamReading {
        &self.sock_foam
    }

    pub fn set_sock_foam(&mut self, reading: SockFoamReading) {
        self.sock_foam = reading;
    }

    /// Number of points with at least one non-blank reading.
    pub fn recorded_points(&self) -> usize {
        self.readings.values().filter(|r| !r.is_blank()).count()
    }
}

/// One side of a grid row: the point label followed by its four readings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridSide {
    pub label: String,
    pub readings: [String; 4],
}

impl GridSide {
    fn cells(&self) -> [&str; 5] {
        [
            &self.label,
            &self.readings[0],
            &self.readings[1],
            &self.readings[2],
            &self.readings[3],
        ]
    }
}

/// A data row pairing the left point and the right point at the same index.
///
/// A side is `None` once its column has run out of points; it renders as blank
/// filler cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridRow {
    pub left: Option<GridSide>,
    pub right: Option<GridSide>,
}

impl GridRow {
    /// The ten cell texts of the row, left side first.
    pub fn cells(&self) -> [&str; 10] {
        let blank = ["", "", "", "", ""];
        let left = self.left.as_ref().map(GridSide::cells).unwrap_or(blank);
        let right = self.right.as_ref().map(GridSide::cells).unwrap_or(blank);
        [
            left[0], left[1], left[2], left[3], left[4], right[0], right[1], right[2], right[3],
            right[4],
        ]
    }
}

/// Two-column measurement table ready for rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MeasurementGrid {
    /// `[check items, first, second, third, fourth]`, repeated on both sides.
    pub header: [String; 5],
    pub rows: Vec<GridRow>,
}

impl MeasurementGrid {
    /// Pairs `left` and `right` by position.
    ///
    /// The grid has `max(left.len(), right.len())` rows.  `label` supplies the
    /// display name of each point in the target language.
    pub fn build<F>(
        left: &[MeasurementPoint],
        right: &[MeasurementPoint],
        sheet: &MeasurementSheet,
        header: [String; 5],
        mut label: F,
    ) -> Self
    where
        F: FnMut(MeasurementPoint) -> String,
    {
        let mut side = |point: Option<&MeasurementPoint>| {
            point.map(|&point| {
                let readings = sheet
                    .get(point)
                    .map(|r| r.values().map(str::to_owned))
                    .unwrap_or_default();
                GridSide {
                    label: label(point),
                    readings,
                }
            })
        };

        let rows = (0..left.len().max(right.len()))
            .map(|index| GridRow {
                left: side(left.get(index)),
                right: side(right.get(index)),
            })
            .collect();

        Self { header, rows }
    }
}

/// The single after/before row printed below the grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SockFoamRow {
    pub label: String,
    pub after_label: String,
    pub after: String,
    pub before_label: String,
    pub before: String,
}

impl SockFoamRow {
    pub fn cells(&self) -> [&str; 5] {
        [
            &self.label,
            &self.after_label,
            &self.after,
            &self.before_label,
            &self.before,
        ]
    }
}
