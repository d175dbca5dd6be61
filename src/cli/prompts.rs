//! Interactive passenger form using dialoguer

use std::collections::BTreeMap;

use anyhow::Result;
use dialoguer::{Confirm, Input, Select};

use super::args::PassengerArgs;
use crate::pipeline::passenger::{MAX_AGE, MAX_CHILDREN, MAX_PARENTS, MAX_SIBLINGS};
use crate::pipeline::{CustomPassenger, FareBounds, Port, Sex};

fn prompt_count(prompt: &str, default: u32, max: u32) -> Result<u32> {
    let value = Input::<u32>::new()
        .with_prompt(format!("{} (0-{})", prompt, max))
        .default(default)
        .validate_with(move |v: &u32| -> Result<(), String> {
            if *v <= max {
                Ok(())
            } else {
                Err(format!("must be at most {}", max))
            }
        })
        .interact_text()?;
    Ok(value)
}

/// Ask for every passenger field, starting from `defaults`.
///
/// The fare prompt is bounded by the fares paid in the chosen class.
pub fn prompt_passenger(
    defaults: &PassengerArgs,
    fares: &BTreeMap<u8, FareBounds>,
) -> Result<CustomPassenger> {
    let classes = ["1st class", "2nd class", "3rd class"];
    let pclass = Select::new()
        .with_prompt("Passenger class")
        .items(&classes)
        .default(usize::from(defaults.pclass.clamp(1, 3)) - 1)
        .interact()?
        + 1;
    let pclass = pclass as u8;

    let sexes = [Sex::Female, Sex::Male];
    let sex_idx = Select::new()
        .with_prompt("Sex")
        .items(&sexes)
        .default(sexes.iter().position(|s| *s == defaults.sex).unwrap_or(1))
        .interact()?;

    let age = prompt_count("Age", defaults.age.min(MAX_AGE), MAX_AGE)?;
    let spouse = Confirm::new()
        .with_prompt("Travelling with a spouse?")
        .default(defaults.spouse)
        .interact()?;
    let siblings = prompt_count("Siblings aboard", defaults.siblings, MAX_SIBLINGS)?;
    let parents = prompt_count("Parents aboard", defaults.parents, MAX_PARENTS)?;
    let children = prompt_count("Children aboard", defaults.children, MAX_CHILDREN)?;

    let bounds = fares.get(&pclass).copied();
    let fare_prompt = match bounds {
        Some(b) => format!("Fare ({:.2}-{:.2})", b.min, b.max),
        None => "Fare".to_string(),
    };
    let fare = Input::<f64>::new()
        .with_prompt(fare_prompt)
        .default(defaults.fare.or(bounds.map(|b| b.median)).unwrap_or(0.0))
        .validate_with(move |v: &f64| -> Result<(), String> {
            match bounds {
                Some(b) if *v < b.min || *v > b.max => {
                    Err(format!("must be between {:.2} and {:.2}", b.min, b.max))
                }
                _ if !v.is_finite() || *v < 0.0 => Err("must be zero or more".to_string()),
                _ => Ok(()),
            }
        })
        .interact_text()?;

    let ports = Port::ALL;
    let port_idx = Select::new()
        .with_prompt("Port of embarkation")
        .items(&ports)
        .default(ports.iter().position(|p| *p == defaults.embarked).unwrap_or(2))
        .interact()?;

    Ok(CustomPassenger {
        pclass,
        sex: sexes[sex_idx],
        age,
        spouse,
        siblings,
        parents,
        children,
        fare,
        embarked: ports[port_idx],
    })
}
