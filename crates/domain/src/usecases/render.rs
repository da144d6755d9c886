//! Rendering use case - turns a pet record into platform-agnostic post content

use crate::model::{AdoptablePet, Post};

/// Default rendering rule shared by all posters
///
/// Platform-specific posters may override `SocialPoster::format_post`;
/// this baseline covers the common case.
pub fn format_post(pet: &AdoptablePet) -> Post {
    let mut text = format!(
        "Meet {}! This adorable {} {} is looking for a forever home in {}.",
        pet.name, pet.breed, pet.species, pet.location
    );

    if !pet.description.is_empty() {
        text.push_str("\n\n");
        text.push_str(&pet.description);
    }

    if let Some(url) = &pet.adoption_url {
        text.push_str(&format!("\n\nAdopt {}: {}", pet.name, url));
    }

    Post {
        text,
        image_url: pet.image_url.clone(),
        link: pet.adoption_url.clone(),
        alt_text: Some(format!(
            "Photo of {}, a {} {} available for adoption",
            pet.name, pet.breed, pet.species
        )),
        tags: vec![
            "adoptdontshop".to_string(),
            "rescue".to_string(),
            pet.species.to_string(),
            breed_tag(&pet.breed),
        ],
    }
}

/// Lowercased breed with internal spaces removed, e.g. "Great Dane" -> "greatdane"
fn breed_tag(breed: &str) -> String {
    breed.to_lowercase().replace(' ', "")
}
