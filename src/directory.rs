//! Lookup of clients, suppliers and categories by id

use std::collections::HashMap;

use crate::types::*;

/// Label shown when a client or supplier id is unknown
pub const UNKNOWN_PARTY: &str = "Client/supplier not found";
/// Label shown when a category id is unknown
pub const UNKNOWN_CATEGORY: &str = "Category not found";

/// Names for the foreign references carried by receivables and transactions
#[derive(Debug, Clone, Default)]
pub struct Directory {
    parties: HashMap<String, ClientSupplier>,
    categories: HashMap<String, Category>,
}

impl Directory {
    pub fn new(parties: Vec<ClientSupplier>, categories: Vec<Category>) -> Self {
        Self {
            parties: parties.into_iter().map(|p| (p.id.clone(), p)).collect(),
            categories: categories.into_iter().map(|c| (c.id.clone(), c)).collect(),
        }
    }

    pub fn add_party(&mut self, party: ClientSupplier) {
        self.parties.insert(party.id.clone(), party);
    }

    pub fn add_category(&mut self, category: Category) {
        self.categories.insert(category.id.clone(), category);
    }

    pub fn party(&self, id: &str) -> Option<&ClientSupplier> {
        self.parties.get(id)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.get(id)
    }

    /// Display name of a client or supplier, with a fallback label
    pub fn party_name(&self, id: &str) -> &str {
        self.party(id).map(|p| p.name.as_str()).unwrap_or(UNKNOWN_PARTY)
    }

    /// Display name of a category, with a fallback label
    pub fn category_name(&self, id: &str) -> &str {
        self.category(id).map(|c| c.name.as_str()).unwrap_or(UNKNOWN_CATEGORY)
    }

    /// Clients only, sorted by name
    pub fn clients(&self) -> Vec<&ClientSupplier> {
        self.parties_of(PartyKind::Client)
    }

    /// Suppliers only, sorted by name
    pub fn suppliers(&self) -> Vec<&ClientSupplier> {
        self.parties_of(PartyKind::Supplier)
    }

    /// Categories of the given kind, sorted by name
    pub fn categories_of(&self, kind: TransactionType) -> Vec<&Category> {
        let mut categories: Vec<&Category> =
            self.categories.values().filter(|c| c.kind == kind).collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        categories
    }

    fn parties_of(&self, kind: PartyKind) -> Vec<&ClientSupplier> {
        let mut parties: Vec<&ClientSupplier> =
            self.parties.values().filter(|p| p.kind == kind).collect();
        parties.sort_by(|a, b| a.name.cmp(&b.name));
        parties
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_and_fallbacks() {
        let directory = Directory::new(
            vec![
                ClientSupplier {
                    id: "c1".to_string(),
                    name: "Acme".to_string(),
                    kind: PartyKind::Client,
                },
                ClientSupplier {
                    id: "s1".to_string(),
                    name: "Paper Co".to_string(),
                    kind: PartyKind::Supplier,
                },
            ],
            vec![Category {
                id: "cat1".to_string(),
                name: "Consulting".to_string(),
                kind: TransactionType::Revenue,
            }],
        );

        assert_eq!(directory.party_name("c1"), "Acme");
        assert_eq!(directory.party_name("zzz"), UNKNOWN_PARTY);
        assert_eq!(directory.category_name("cat1"), "Consulting");
        assert_eq!(directory.category_name("zzz"), UNKNOWN_CATEGORY);
        assert_eq!(directory.clients().len(), 1);
        assert_eq!(directory.suppliers()[0].name, "Paper Co");
        assert!(directory.categories_of(TransactionType::Expense).is_empty());
    }
}
