mod publish;
mod validation;

pub use publish::{
    branch_name, extract_pull_request_url, ChangeSubmitter, PublishError, ScriptSubmitter,
    PR_DELIMITER,
};
pub use validation::{Inspection, Target};

pub(crate) use publish::PublishService;
pub(crate) use validation::ValidationService;

pub(crate) struct Services {
    pub validation: ValidationService,
    pub publish: PublishService,
}
