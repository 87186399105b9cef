#[derive(Debug, PartialEq)]
pub enum AstNode {
    Text(String),
    Placeholder(Placeholder),
    Plural(Plural),
}

/// `$1`, `$2`, ... referring to the message parameters (1-based in text)
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    pub name: String,
    /// Zero-based index into the parameter list
    pub index: usize,
}

impl Placeholder {
    pub fn new(name: String) -> Result<Self, String> {
        let number = name
            .strip_prefix('$')
            .ok_or("Placeholder must start with '$'")?
            .parse::<usize>()
            .map_err(|_| "Failed to parse index")?;
        if number == 0 {
            return Err("Placeholders are numbered from $1".to_string());
        }
        Ok(Placeholder {
            name,
            index: number - 1,
        })
    }

    pub fn value<'a>(&self, values: &'a [String]) -> Option<&'a str> {
        values.get(self.index).map(|v| v.as_str())
    }
}

impl std::fmt::Display for Placeholder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// `{{PLURAL:$1|one form|other form}}`
///
/// Forms are kept as raw text: they may contain placeholders of their own,
/// which are resolved after a form has been chosen.
#[derive(Debug, Clone, PartialEq)]
pub struct Plural {
    pub placeholder: Placeholder,
    pub forms: Vec<String>,
}

impl std::fmt::Display for Plural {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{{PLURAL:{}", self.placeholder)?;
        for form in &self.forms {
            write!(f, "|{}", form)?;
        }
        write!(f, "}}}}")
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct AstNodeList(pub Vec<AstNode>);

impl AstNodeList {
    pub fn new() -> Self {
        AstNodeList(Vec::new())
    }

    pub fn push(&mut self, node: AstNode) {
        self.0.push(node);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AstNode> {
        self.0.get(index)
    }
}

impl IntoIterator for AstNodeList {
    type Item = AstNode;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a AstNodeList {
    type Item = &'a AstNode;
    type IntoIter = std::slice::Iter<'a, AstNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_index_is_zero_based() {
        let p = Placeholder::new("$2".to_string()).unwrap();
        assert_eq!(p.index, 1);
        assert_eq!(p.to_string(), "$2");
    }

    #[test]
    fn test_placeholder_rejects_bad_names() {
        assert!(Placeholder::new("$0".to_string()).is_err());
        assert!(Placeholder::new("$x".to_string()).is_err());
        assert!(Placeholder::new("1".to_string()).is_err());
    }

    #[test]
    fn test_plural_display_round_trips_source() {
        let plural = Plural {
            placeholder: Placeholder::new("$1".to_string()).unwrap(),
            forms: vec!["bus".to_string(), "buses".to_string()],
        };
        assert_eq!(plural.to_string(), "{{PLURAL:$1|bus|buses}}");
    }
}
