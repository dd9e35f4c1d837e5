use semval::prelude::*;

/// An email address that a one-time code or notification can be sent to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Email(String);

impl Email {
    /// Wrap a raw address without validating it. Call
    /// [`Validate::validate`] before handing it to a service.
    pub fn unvalidated(address: String) -> Self {
        Self(address)
    }

    pub fn address(&self) -> &str {
        &self.0
    }

    fn has_domain(&self) -> bool {
        match self.0.rfind('@') {
            Some(index) => index < self.0.len() - 1,
            None => false,
        }
    }

    fn has_local_part(&self) -> bool {
        match self.0.find('@') {
            Some(index) => index > 0,
            None => false,
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
pub enum EmailInvalidity {
    /// The address has nothing before the `@` symbol.
    MissingLocalPart,

    /// The address has nothing after the `@` symbol.
    MissingDomain,

    /// The address is missing the `@` symbol entirely.
    MissingSeparator,
}

impl Validate for Email {
    type Invalidity = EmailInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        ValidationContext::new()
            .invalidate_if(!self.0.contains('@'), EmailInvalidity::MissingSeparator)
            .invalidate_if(!self.has_local_part(), EmailInvalidity::MissingLocalPart)
            .invalidate_if(!self.has_domain(), EmailInvalidity::MissingDomain)
            .into()
    }
}

impl ValidatedFrom<&str> for Email {
    fn validated_from(from: &str) -> ValidatedResult<Self> {
        let into = Self(from.to_owned());

        match into.validate() {
            Ok(()) => Ok(into),
            Err(context) => Err((into, context)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn validated_from_missing_at_symbol() {
        let (_, context) =
            Email::validated_from("missing-an-at-symbol").expect_err("missing an @");
        let errors = context.into_iter().collect::<Vec<_>>();

        assert!(errors.contains(&EmailInvalidity::MissingSeparator));
    }

    #[test]
    fn validated_from_missing_domain() {
        let (_, context) = Email::validated_from("someone@").expect_err("missing a domain");
        let errors = context.into_iter().collect::<Vec<_>>();

        assert_eq!(vec![EmailInvalidity::MissingDomain], errors);
    }

    #[test]
    fn validated_from_missing_local_part() {
        let (_, context) = Email::validated_from("@somewhere").expect_err("missing a local part");
        let errors = context.into_iter().collect::<Vec<_>>();

        assert_eq!(vec![EmailInvalidity::MissingLocalPart], errors);
    }

    #[test]
    fn validated_from_valid() {
        let parsed = Email::validated_from("someone@somewhere").expect("Parse failed");

        assert_eq!("someone@somewhere", parsed.address());
    }
}
