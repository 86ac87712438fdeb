use chrono_tz::Tz;

/// A transit agency. Its time zone governs how the stop times of its trips
/// are materialised into absolute instants.
#[derive(Debug, Clone)]
pub struct Agency {
    gtfs_id: String,
    name: String,
    url: String,
    time_zone: Tz,
}

impl Agency {
    pub fn new(gtfs_id: String, name: String, url: String, time_zone: Tz) -> Self {
        Self {
            gtfs_id,
            name,
            url,
            time_zone,
        }
    }

    pub fn gtfs_id(&self) -> &str {
        &self.gtfs_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }
}

impl PartialEq for Agency {
    fn eq(&self, other: &Self) -> bool {
        self.gtfs_id == other.gtfs_id
    }
}

impl Eq for Agency {}
