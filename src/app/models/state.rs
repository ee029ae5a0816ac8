//! US states and territories with reverse lookup by abbreviation and name

use super::key::{Key, Keyed};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

macro_rules! us_states {
    ($($variant:ident => ($name:literal, $abbr:literal)),+ $(,)?) => {
        /// Closed list of US states, the District of Columbia and territories
        ///
        /// `Unknown` is the fallback for every failed reverse lookup.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum UsState {
            $($variant,)+
            Unknown,
        }

        impl UsState {
            /// Every state including `Unknown`
            pub const ALL: &'static [UsState] = &[$(UsState::$variant,)+ UsState::Unknown];

            /// Display name (e.g. "Texas")
            pub fn name(&self) -> &'static str {
                match self {
                    $(UsState::$variant => $name,)+
                    UsState::Unknown => "Unknown",
                }
            }

            /// Two-letter postal abbreviation (empty for `Unknown`)
            pub fn abbreviation(&self) -> &'static str {
                match self {
                    $(UsState::$variant => $abbr,)+
                    UsState::Unknown => "",
                }
            }
        }
    };
}

us_states! {
    Alabama => ("Alabama", "AL"),
    Alaska => ("Alaska", "AK"),
    AmericanSamoa => ("American Samoa", "AS"),
    Arizona => ("Arizona", "AZ"),
    Arkansas => ("Arkansas", "AR"),
    California => ("California", "CA"),
    Colorado => ("Colorado", "CO"),
    Connecticut => ("Connecticut", "CT"),
    Delaware => ("Delaware", "DE"),
    DistrictOfColumbia => ("District of Columbia", "DC"),
    FederatedStatesOfMicronesia => ("Federated States of Micronesia", "FM"),
    Florida => ("Florida", "FL"),
    Georgia => ("Georgia", "GA"),
    Guam => ("Guam", "GU"),
    Hawaii => ("Hawaii", "HI"),
    Idaho => ("Idaho", "ID"),
    Illinois => ("Illinois", "IL"),
    Indiana => ("Indiana", "IN"),
    Iowa => ("Iowa", "IA"),
    Kansas => ("Kansas", "KS"),
    Kentucky => ("Kentucky", "KY"),
    Louisiana => ("Louisiana", "LA"),
    Maine => ("Maine", "ME"),
    Maryland => ("Maryland", "MD"),
    MarshallIslands => ("Marshall Islands", "MH"),
    Massachusetts => ("Massachusetts", "MA"),
    Michigan => ("Michigan", "MI"),
    Minnesota => ("Minnesota", "MN"),
    Mississippi => ("Mississippi", "MS"),
    Missouri => ("Missouri", "MO"),
    Montana => ("Montana", "MT"),
    Nebraska => ("Nebraska", "NE"),
    Nevada => ("Nevada", "NV"),
    NewHampshire => ("New Hampshire", "NH"),
    NewJersey => ("New Jersey", "NJ"),
    NewMexico => ("New Mexico", "NM"),
    NewYork => ("New York", "NY"),
    NorthCarolina => ("North Carolina", "NC"),
    NorthDakota => ("North Dakota", "ND"),
    NorthernMarianaIslands => ("Northern Mariana Islands", "MP"),
    Ohio => ("Ohio", "OH"),
    Oklahoma => ("Oklahoma", "OK"),
    Oregon => ("Oregon", "OR"),
    Palau => ("Palau", "PW"),
    Pennsylvania => ("Pennsylvania", "PA"),
    PuertoRico => ("Puerto Rico", "PR"),
    RhodeIsland => ("Rhode Island", "RI"),
    SouthCarolina => ("South Carolina", "SC"),
    SouthDakota => ("South Dakota", "SD"),
    Tennessee => ("Tennessee", "TN"),
    Texas => ("Texas", "TX"),
    Utah => ("Utah", "UT"),
    Vermont => ("Vermont", "VT"),
    VirginIslands => ("Virgin Islands", "VI"),
    Virginia => ("Virginia", "VA"),
    Washington => ("Washington", "WA"),
    WestVirginia => ("West Virginia", "WV"),
    Wisconsin => ("Wisconsin", "WI"),
    Wyoming => ("Wyoming", "WY"),
}

/// Process-wide lookup tables, built once on first use and never mutated
struct StateRegistry {
    keys: Vec<Key>,
    by_abbreviation: HashMap<&'static str, UsState>,
    by_name: HashMap<String, UsState>,
}

static REGISTRY: LazyLock<StateRegistry> = LazyLock::new(|| {
    let keys = UsState::ALL
        .iter()
        .map(|state| Key::new(state.abbreviation()))
        .collect();

    let by_abbreviation = UsState::ALL
        .iter()
        .map(|state| (state.abbreviation(), *state))
        .collect();

    let by_name = UsState::ALL
        .iter()
        .map(|state| (name_lookup_form(state.name()), *state))
        .collect();

    StateRegistry {
        keys,
        by_abbreviation,
        by_name,
    }
});

/// Case and whitespace insensitive form used for name lookups
fn name_lookup_form(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .flat_map(char::to_uppercase)
        .collect()
}

impl UsState {
    /// Look up a state by its postal abbreviation, falling back to `Unknown`
    pub fn find_by_abbreviation(abbreviation: &str) -> UsState {
        REGISTRY
            .by_abbreviation
            .get(abbreviation.trim().to_uppercase().as_str())
            .copied()
            .unwrap_or(UsState::Unknown)
    }

    /// Look up a state by display name (case and space insensitive), falling back to `Unknown`
    pub fn find_by_name(name: &str) -> UsState {
        REGISTRY
            .by_name
            .get(&name_lookup_form(name))
            .copied()
            .unwrap_or(UsState::Unknown)
    }

    /// Key of this state, owned by the process-wide registry
    pub fn static_key(&self) -> &'static Key {
        let registry: &'static StateRegistry = &REGISTRY;
        // ALL is laid out in declaration order, so the discriminant indexes it
        &registry.keys[*self as usize]
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, UsState::Unknown)
    }
}

impl Keyed for UsState {
    fn key(&self) -> &Key {
        self.static_key()
    }
}

impl fmt::Display for UsState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
