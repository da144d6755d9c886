//! Manual source with a fixed pet list, for demos and local testing

use async_trait::async_trait;
use cutepets_domain::{AdoptablePet, PetSource, Species, SourceError};

/// Static source returning a hardcoded set of pets; never fails and
/// never touches the network
#[derive(Debug, Default)]
pub struct SourceManual;

impl SourceManual {
    pub fn new() -> Self {
        Self
    }

    /// The fixed demo records
    pub fn pets() -> Vec<AdoptablePet> {
        vec![
            AdoptablePet {
                name: "Doli".to_string(),
                species: Species::Dog,
                breed: "Labrador Retriever Mix".to_string(),
                location: "Boston, MA".to_string(),
                description: "Doli is a gentle girl who loves long walks and belly rubs."
                    .to_string(),
                adoption_url: Some("https://www.rescuegroups.org/pet/doli".to_string()),
                image_url: Some("https://cdn.example.com/pets/doli.jpg".to_string()),
            },
            AdoptablePet {
                name: "Kathy".to_string(),
                species: Species::Dog,
                breed: "Beagle".to_string(),
                location: "Boston, MA".to_string(),
                description: "Kathy is a curious beagle with a nose for adventure.".to_string(),
                adoption_url: Some("https://www.rescuegroups.org/pet/kathy".to_string()),
                image_url: Some("https://cdn.example.com/pets/kathy.jpg".to_string()),
            },
            AdoptablePet {
                name: "Cylana".to_string(),
                species: Species::Cat,
                breed: "Domestic Short Hair".to_string(),
                location: "Boston, MA".to_string(),
                description: "Cylana is a quiet lap cat looking for a sunny windowsill."
                    .to_string(),
                adoption_url: Some("https://www.rescuegroups.org/pet/cylana".to_string()),
                image_url: Some("https://cdn.example.com/pets/cylana.jpg".to_string()),
            },
        ]
    }
}

#[async_trait]
impl PetSource for SourceManual {
    fn source_name(&self) -> String {
        "Manual".to_string()
    }

    async fn fetch_pets(&self) -> Result<Vec<AdoptablePet>, SourceError> {
        Ok(Self::pets())
    }
}
