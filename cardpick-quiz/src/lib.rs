pub mod answers;
pub mod question;
pub mod session;

pub use answers::{Answer, AnswerSet};
pub use question::{
    EarlyExit, Question, QuestionOption, QuestionSet, QuestionSetError, SelectionMode,
};
pub use session::{Session, SessionError, SessionOutcome, SessionState};
