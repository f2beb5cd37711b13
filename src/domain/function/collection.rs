//! Named namespace of built functions

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use super::artifact::PromptFunction;
use crate::domain::error::FunctionError;

/// Functions addressable by name
#[derive(Debug, Default)]
pub struct FunctionCollection {
    functions: RwLock<HashMap<String, Arc<PromptFunction>>>,
}

impl FunctionCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a function; names must be unique within the collection
    pub fn add(&self, function: PromptFunction) -> Result<Arc<PromptFunction>, FunctionError> {
        let mut functions = self.functions.write().unwrap_or_else(PoisonError::into_inner);

        if functions.contains_key(function.name()) {
            return Err(FunctionError::duplicate_function(function.name()));
        }

        debug!(function = %function.name(), "Adding function to collection");
        let function = Arc::new(function);
        functions.insert(function.name().to_string(), Arc::clone(&function));
        Ok(function)
    }

    pub fn get(&self, name: &str) -> Option<Arc<PromptFunction>> {
        self.functions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    pub fn remove(&self, name: &str) -> Option<Arc<PromptFunction>> {
        self.functions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
    }

    /// Function names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .functions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.functions.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::function::{FunctionArguments, PromptFunctionBuilder};
    use crate::domain::template::PlainTemplate;

    fn function(name: &str) -> PromptFunction {
        PromptFunctionBuilder::new()
            .with_name(name)
            .with_template(Box::new(PlainTemplate::new(format!("I am {}", name))))
            .build()
            .unwrap()
    }

    #[test]
    fn test_add_and_get() {
        let collection = FunctionCollection::new();
        collection.add(function("greet")).unwrap();

        assert!(collection.contains("greet"));
        let greet = collection.get("greet").unwrap();
        assert_eq!(greet.render(&FunctionArguments::new()).unwrap(), "I am greet");
        assert!(collection.get("missing").is_none());
    }

    #[test]
    fn test_duplicate_rejected() {
        let collection = FunctionCollection::new();
        collection.add(function("greet")).unwrap();

        assert_eq!(
            collection.add(function("greet")).unwrap_err(),
            FunctionError::duplicate_function("greet")
        );
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_names_sorted_and_remove() {
        let collection = FunctionCollection::new();
        collection.add(function("summarize")).unwrap();
        collection.add(function("greet")).unwrap();

        assert_eq!(collection.names(), vec!["greet", "summarize"]);

        assert!(collection.remove("greet").is_some());
        assert!(collection.remove("greet").is_none());
        assert_eq!(collection.names(), vec!["summarize"]);
        assert!(!collection.is_empty());
    }

    #[test]
    fn test_shared_across_threads() {
        let collection = Arc::new(FunctionCollection::new());
        collection.add(function("greet")).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let collection = Arc::clone(&collection);
                std::thread::spawn(move || {
                    collection
                        .get("greet")
                        .map(|f| f.render(&FunctionArguments::new()))
                })
            })
            .collect();

        for handle in handles {
            let rendered = handle.join().unwrap().unwrap().unwrap();
            assert_eq!(rendered, "I am greet");
        }
    }
}
