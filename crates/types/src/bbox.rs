use crate::geo::GeoPoint;
use geo::Rect;
use serde::{Deserialize, Serialize};

/// A closed axis-aligned rectangle in longitude/latitude degrees.
///
/// This is a wrapper around `geo::Rect`, so the corners are always
/// normalized (`min <= max` on both axes). Use
/// `cellpath::compute::validation::bounding_box` when inverted input must be
/// rejected instead of silently swapped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// The underlying geometric rectangle
    pub rect: Rect,
}

impl BoundingBox {
    /// Create a new bounding box in GeoJSON order.
    ///
    /// # Arguments
    ///
    /// * `min_lon` - Western edge
    /// * `min_lat` - Southern edge
    /// * `max_lon` - Eastern edge
    /// * `max_lat` - Northern edge
    ///
    /// # Examples
    ///
    /// ```
    /// use cellpath_types::bbox::BoundingBox;
    ///
    /// let bbox = BoundingBox::new(0.0, 0.0, 0.1, 0.1);
    /// assert_eq!(bbox.max_lat(), 0.1);
    /// ```
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            rect: Rect::new(
                geo::coord! { x: min_lon, y: min_lat },
                geo::coord! { x: max_lon, y: max_lat },
            ),
        }
    }

    pub fn min_lon(&self) -> f64 {
        self.rect.min().x
    }

    pub fn min_lat(&self) -> f64 {
        self.rect.min().y
    }

    pub fn max_lon(&self) -> f64 {
        self.rect.max().x
    }

    pub fn max_lat(&self) -> f64 {
        self.rect.max().y
    }

    /// Longitude span in degrees.
    pub fn width(&self) -> f64 {
        self.max_lon() - self.min_lon()
    }

    /// Latitude span in degrees.
    pub fn height(&self) -> f64 {
        self.max_lat() - self.min_lat()
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_lon() + self.max_lon()) / 2.0,
            (self.min_lat() + self.max_lat()) / 2.0,
        )
    }

    /// Zero width or zero height.
    pub fn is_degenerate(&self) -> bool {
        self.width() == 0.0 || self.height() == 0.0
    }

    /// Closed containment test (edges count as inside).
    pub fn contains_point(&self, point: &GeoPoint) -> bool {
        point.lon() >= self.min_lon()
            && point.lon() <= self.max_lon()
            && point.lat() >= self.min_lat()
            && point.lat() <= self.max_lat()
    }

    /// True when the two boxes share any area or boundary.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        !(self.max_lon() < other.min_lon()
            || self.min_lon() > other.max_lon()
            || self.max_lat() < other.min_lat()
            || self.min_lat() > other.max_lat())
    }

    /// GeoJSON `bbox` member order: `[min_lon, min_lat, max_lon, max_lat]`.
    pub fn to_geojson_bbox(&self) -> [f64; 4] {
        [self.min_lon(), self.min_lat(), self.max_lon(), self.max_lat()]
    }
}

/// One unit of a partitioned region.
///
/// `depth` counts how many times the coarse cell this leaf came from was
/// halved; 0 means the coarse cell was already small enough.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    pub bbox: BoundingBox,
    pub depth: u32,
}

impl GridCell {
    pub fn new(bbox: BoundingBox, depth: u32) -> Self {
        Self { bbox, depth }
    }

    /// Split at `mid_lon` into a western and an eastern half.
    pub fn split_lon(&self, mid_lon: f64) -> (GridCell, GridCell) {
        let b = &self.bbox;
        (
            GridCell::new(
                BoundingBox::new(b.min_lon(), b.min_lat(), mid_lon, b.max_lat()),
                self.depth + 1,
            ),
            GridCell::new(
                BoundingBox::new(mid_lon, b.min_lat(), b.max_lon(), b.max_lat()),
                self.depth + 1,
            ),
        )
    }

    /// Split at `mid_lat` into a southern and a northern half.
    pub fn split_lat(&self, mid_lat: f64) -> (GridCell, GridCell) {
        let b = &self.bbox;
        (
            GridCell::new(
                BoundingBox::new(b.min_lon(), b.min_lat(), b.max_lon(), mid_lat),
                self.depth + 1,
            ),
            GridCell::new(
                BoundingBox::new(b.min_lon(), mid_lat, b.max_lon(), b.max_lat()),
                self.depth + 1,
            ),
        )
    }
}

impl From<BoundingBox> for GridCell {
    fn from(bbox: BoundingBox) -> Self {
        Self::new(bbox, 0)
    }
}
