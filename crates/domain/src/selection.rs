//! Selection policy: pick one postable pet from the aggregated pool

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::model::AdoptablePet;

/// Choose uniformly at random among pets that have an image
///
/// Returns `None` when the pool is empty or no pet carries an image;
/// that is a normal outcome, not an error. The random source is
/// injected so callers and tests can seed it.
pub fn choose_postable<'a, R>(pool: &'a [AdoptablePet], rng: &mut R) -> Option<&'a AdoptablePet>
where
    R: Rng + ?Sized,
{
    let postable: Vec<&AdoptablePet> = pool.iter().filter(|p| p.is_postable()).collect();
    postable.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Species;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;

    fn pet(name: &str, image_url: Option<&str>) -> AdoptablePet {
        AdoptablePet {
            name: name.to_string(),
            species: Species::Dog,
            breed: "Mixed".to_string(),
            location: "Boston, MA".to_string(),
            description: String::new(),
            adoption_url: None,
            image_url: image_url.map(String::from),
        }
    }

    #[test]
    fn test_empty_pool_yields_none() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(choose_postable(&[], &mut rng).is_none());
    }

    #[test]
    fn test_pool_without_images_yields_none() {
        let pool = vec![pet("Ada", None), pet("Bo", None)];
        let mut rng = StdRng::seed_from_u64(1);
        assert!(choose_postable(&pool, &mut rng).is_none());
    }

    #[test]
    fn test_never_selects_imageless_pet() {
        let pool = vec![
            pet("Ada", None),
            pet("Bo", Some("https://example.com/bo.jpg")),
            pet("Cy", None),
        ];
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let chosen = choose_postable(&pool, &mut rng).expect("one postable pet");
            assert_eq!(chosen.name, "Bo");
        }
    }

    #[test]
    fn test_selection_is_roughly_uniform() {
        let pool: Vec<AdoptablePet> = ["Ada", "Bo", "Cy", "Di"]
            .iter()
            .map(|name| pet(name, Some("https://example.com/p.jpg")))
            .collect();

        let mut rng = StdRng::seed_from_u64(7);
        let trials = 4000;
        let mut counts: HashMap<String, u32> = HashMap::new();

        for _ in 0..trials {
            let chosen = choose_postable(&pool, &mut rng).expect("postable pool");
            *counts.entry(chosen.name.clone()).or_default() += 1;
        }

        // Each of the 4 pets should land near trials/4 = 1000
        assert_eq!(counts.len(), 4);
        for (name, count) in counts {
            assert!(
                (800..=1200).contains(&count),
                "{} chosen {} times, expected ~1000",
                name,
                count
            );
        }
    }
}
