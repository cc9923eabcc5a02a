// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::fmt::{self, Display};

/// Heterogeneous event payload used across the channel tests.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum TestData {
    Person { name: String, age: u32 },
    Animal { name: String, legs: u32 },
    Plant { species: String, height: u32 },
}

pub fn person_alice() -> TestData {
    TestData::person("Alice", 25)
}

pub fn person_bob() -> TestData {
    TestData::person("Bob", 30)
}

pub fn person_charlie() -> TestData {
    TestData::person("Charlie", 35)
}

pub fn animal_dog() -> TestData {
    TestData::animal("Dog", 4)
}

pub fn animal_spider() -> TestData {
    TestData::animal("Spider", 8)
}

pub fn plant_rose() -> TestData {
    TestData::plant("Rose", 15)
}

impl TestData {
    pub fn person(name: impl Into<String>, age: u32) -> Self {
        Self::Person {
            name: name.into(),
            age,
        }
    }

    pub fn animal(name: impl Into<String>, legs: u32) -> Self {
        Self::Animal {
            name: name.into(),
            legs,
        }
    }

    pub fn plant(species: impl Into<String>, height: u32) -> Self {
        Self::Plant {
            species: species.into(),
            height,
        }
    }

    /// The name (or species) carried by the payload.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Person { name, .. } | Self::Animal { name, .. } => name,
            Self::Plant { species, .. } => species,
        }
    }
}

impl Display for TestData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Person { name, age } => write!(f, "Person[name={name}, age={age}]"),
            Self::Animal { name, legs } => write!(f, "Animal[name={name}, legs={legs}]"),
            Self::Plant { species, height } => {
                write!(f, "Plant[species={species}, height={height}]")
            }
        }
    }
}
