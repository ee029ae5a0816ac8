//! Shared fixtures for reference graph tests
//!
//! The fixtures describe four metropolitan areas (one in Puerto Rico), one
//! micropolitan area that the default options skip, and six weather stations
//! covering direct county links, fallback city links and unlinked stations.

use crate::app::services::record_source::InMemorySource;
use crate::app::services::reference_graph::{
    GraphLoadStats, GraphOptions, GraphSources, ReferenceGraph,
};


pub const POPULATION_ROWS: &[&str] = &[
    r#""Geographic area","Census 2000","Census 2010","Change","Percent change""#,
    "",
    r#""Metropolitan statistical area",,,,"#,
    r#""Austin-Round Rock, TX","1,763,314","1,939,645","176,331","10.0""#,
    r#""Dallas-Fort Worth-Arlington, TX","5,161,544","6,371,773","1,210,229","23.4""#,
    r#""Kansas City, MO-KS","1,836,038","2,035,334","199,296","10.9""#,
    r#""Micropolitan statistical area",,,,"#,
    r#""Athens, TX","73,277","78,532","5,255","7.2""#,
    r#""Puerto Rico",,,,"#,
    r#""Metropolitan statistical area",,,,"#,
    r#""San Juan-Caguas-Guaynabo, PR","2,509,007","2,478,905","-30,102","-1.2""#,
];

pub const COUNTY_LINK_ROWS: &[&str] = &[
    r#""CBSA Code","Division Code","CSA Code","CBSA Title","Area Type","Division Title","CSA Title","County/County Equivalent","State Name""#,
    r#""12420",,,"Austin-Round Rock, TX","Metropolitan Statistical Area",,,"Travis County","Texas""#,
    r#""12420",,,"Austin-Round Rock, TX","Metropolitan Statistical Area",,,"Williamson County","Texas""#,
    r#""19100",,,"Dallas-Fort Worth-Arlington, TX","Metropolitan Statistical Area",,,"Dallas County","Texas""#,
    r#""28140",,,"Kansas City, MO-KS","Metropolitan Statistical Area",,,"Jackson County","Missouri""#,
    r#""28140",,,"Kansas City, MO-KS","Metropolitan Statistical Area",,,"Johnson County","Kansas""#,
    r#""28140",,,"Kansas City, MO-KS","Metropolitan Statistical Area",,,"Travis County","Texas""#,
    r#""99999",,,"Nowhere City, ZZ","Metropolitan Statistical Area",,,"Lost County","Texas""#,
    r#""12420",,,"Austin-Round Rock, TX""#,
];

pub const STATION_MASTER_ROWS: &[&str] = &[
    "REGION|WBAN_ID|STATION_NAME|STATE_PROVINCE|COUNTY|COUNTRY|EXTENDED_NAME",
    "NA|13904|AUSTIN BERGSTROM INTL AP|TX|TRAVIS|US|AUSTIN-BERGSTROM INTERNATIONAL AIRPORT",
    "NA|13958|AUSTIN CAMP MABRY|TX|TRAVIS|US|CAMP MABRY",
    "NA|03927|DALLAS FORT WORTH INTL AP|TX|TARRANT|US|DFW AIRPORT",
    "NA|13988|KANSAS CITY DOWNTOWN AP|MO|JACKSON|US|CHARLES B WHEELER DOWNTOWN AIRPORT",
    "NA|93999|ROUND ROCK MUNI|TX||US|",
    "NA|11641|SAN JUAN INTL AP|PR|SAN JUAN|US|LUIS MUNOZ MARIN INTERNATIONAL AIRPORT",
    "NA|",
];

pub const STATION_ACTIVITY_ROWS: &[&str] = &[
    "13904|AUS|AUSTIN BERGSTROM INTL AP|USA|30.183|-97.680|AUSTIN|TX",
    "93999|RRK|ROUND ROCK MUNI|USA|30.500|-97.700|ROUND ROCK|TX",
    "03927|DFW|DALLAS FORT WORTH INTL AP|USA|32.898|-97.019|DALLAS|TX",
    "11641|SJU|SAN JUAN INTL AP|USA|18.433|-66.011|SAN JUAN|PR",
    "55555|NWH|NOWHERE FIELD|USA|0.0|0.0|NOWHERE|TX",
    "x|y",
];

/// In-memory copies of the four fixture sources
pub struct FixtureSources {
    pub population: InMemorySource,
    pub county_links: InMemorySource,
    pub station_master: InMemorySource,
    pub station_activity: InMemorySource,
}

impl FixtureSources {
    pub fn new() -> Self {
        Self::with_rows(
            POPULATION_ROWS,
            COUNTY_LINK_ROWS,
            STATION_MASTER_ROWS,
            STATION_ACTIVITY_ROWS,
        )
    }

    pub fn with_rows(
        population: &[&str],
        county_links: &[&str],
        station_master: &[&str],
        station_activity: &[&str],
    ) -> Self {
        Self {
            population: InMemorySource::new("population", population.iter().copied()),
            county_links: InMemorySource::new("county links", county_links.iter().copied()),
            station_master: InMemorySource::new("station master", station_master.iter().copied()),
            station_activity: InMemorySource::new(
                "station activity",
                station_activity.iter().copied(),
            ),
        }
    }

    pub fn sources(&self) -> GraphSources<'_> {
        GraphSources {
            population: &self.population,
            county_links: &self.county_links,
            station_master: &self.station_master,
            station_activity: &self.station_activity,
        }
    }

    pub fn load(&self) -> (ReferenceGraph, GraphLoadStats) {
        ReferenceGraph::load(self.sources(), &GraphOptions::default()).unwrap()
    }
}

/// Graph built from the standard fixtures
pub fn fixture_graph() -> ReferenceGraph {
    FixtureSources::new().load().0
}
