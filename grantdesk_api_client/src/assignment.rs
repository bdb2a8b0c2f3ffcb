//! The role grant assignment session: load a role's permission tree,
//! toggle grants in memory, then submit the full selection back
//! as a replacement of the role's grant set.

use std::fmt::{Display, Formatter};
use std::mem;

use grantdesk_core::{
    ids::{PermissionId, RoleId},
    permission_tree::PermissionTree,
};
use thiserror::Error;



/// The grant persistence contract the assignment session drives.
///
/// In the deployed system this is the Grantdesk API
/// (see [`RolesApi`][crate::api::RolesApi]); tests substitute
/// an in-memory implementation.
pub trait GrantStore {
    type Error: std::error::Error + 'static;

    /// Returns the full permission tree, annotated with the role's
    /// current enabled flags.
    async fn load_role_grants(&self, role_id: RoleId) -> Result<PermissionTree, Self::Error>;

    /// Atomically replaces the role's grant set with the given IDs:
    /// either all of the role's grants become exactly the submitted set,
    /// or none of the change is applied.
    async fn replace_role_grants(
        &self,
        role_id: RoleId,
        permission_ids: Vec<PermissionId>,
    ) -> Result<(), Self::Error>;
}



/// Which phase an [`AssignmentSession`] is currently in.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionStateKind {
    Idle,
    Loading,
    Editing,
    Submitting,
}

impl Display for SessionStateKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Loading => write!(f, "loading"),
            Self::Editing => write!(f, "editing"),
            Self::Submitting => write!(f, "submitting"),
        }
    }
}


enum SessionState {
    Idle,

    Loading,

    Editing {
        role_id: RoleId,
        permission_tree: PermissionTree,
    },

    Submitting {
        role_id: RoleId,
        permission_tree: PermissionTree,
    },
}

impl SessionState {
    fn kind(&self) -> SessionStateKind {
        match self {
            Self::Idle => SessionStateKind::Idle,
            Self::Loading => SessionStateKind::Loading,
            Self::Editing { .. } => SessionStateKind::Editing,
            Self::Submitting { .. } => SessionStateKind::Submitting,
        }
    }
}



/// An operation was called in a session state that does not permit it.
///
/// These indicate caller bugs (or an in-flight submission, which is
/// an expected rejection), not I/O failures.
#[derive(Debug, Error)]
pub enum AssignmentStateError {
    /// A submission is currently in flight; toggles and further submits
    /// are rejected until the session returns to editing or idle.
    #[error("a submission is already in flight")]
    SubmissionInFlight,

    #[error("{} is not valid while the session is {}", .operation, .current_state)]
    InvalidState {
        operation: &'static str,
        current_state: SessionStateKind,
    },
}


#[derive(Debug, Error)]
pub enum AssignmentError<StoreError>
where
    StoreError: std::error::Error + 'static,
{
    /// The initial fetch of the role's permission tree failed.
    /// The session remains idle; nothing is held in memory.
    #[error("failed to load the role's permission tree")]
    Load {
        #[source]
        error: StoreError,
    },

    /// The grant replacement call failed. The edited tree is retained
    /// and the session returns to editing, so no edits are lost and
    /// the submission can be retried.
    #[error("failed to replace the role's grant set")]
    Save {
        #[source]
        error: StoreError,
    },

    #[error(transparent)]
    InvalidState(#[from] AssignmentStateError),
}



/// A bounded editing interaction over one role's grants:
/// open (load), any number of toggles, then submit or cancel.
///
/// The session exclusively owns its permission tree for its whole
/// lifetime; edits are pure in-memory updates and the only side effects
/// are the load in [`open`][Self::open] and the save in
/// [`submit`][Self::submit].
pub struct AssignmentSession<Store>
where
    Store: GrantStore,
{
    store: Store,

    state: SessionState,
}

impl<Store> AssignmentSession<Store>
where
    Store: GrantStore,
{
    pub fn new(store: Store) -> Self {
        Self {
            store,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionStateKind {
        self.state.kind()
    }

    /// Returns the currently held permission tree,
    /// if the session has one (editing or submitting).
    pub fn permission_tree(&self) -> Option<&PermissionTree> {
        match &self.state {
            SessionState::Editing {
                permission_tree, ..
            }
            | SessionState::Submitting {
                permission_tree, ..
            } => Some(permission_tree),
            _ => None,
        }
    }

    /// Opens an assignment session for the given role by loading its
    /// current grant tree from the store.
    ///
    /// On success the session transitions to editing. On failure the
    /// session stays idle and the load error is surfaced to the caller;
    /// retrying is the caller's decision.
    pub async fn open(&mut self, role_id: RoleId) -> Result<(), AssignmentError<Store::Error>> {
        match &self.state {
            SessionState::Idle => {}
            SessionState::Submitting { .. } => {
                return Err(AssignmentStateError::SubmissionInFlight.into());
            }
            other_state => {
                return Err(AssignmentStateError::InvalidState {
                    operation: "open",
                    current_state: other_state.kind(),
                }
                .into());
            }
        }

        self.state = SessionState::Loading;

        match self.store.load_role_grants(role_id).await {
            Ok(permission_tree) => {
                self.state = SessionState::Editing {
                    role_id,
                    permission_tree,
                };

                Ok(())
            }
            Err(error) => {
                self.state = SessionState::Idle;

                Err(AssignmentError::Load { error })
            }
        }
    }

    /// Sets the enabled flag of a single node in the held tree.
    ///
    /// Pure and effect-free: the held tree is replaced with an updated
    /// copy. Toggling an ID that is not present in the tree is a silent
    /// no-op, and the session stays in editing either way.
    pub fn toggle(
        &mut self,
        permission_id: PermissionId,
        enabled: bool,
    ) -> Result<(), AssignmentStateError> {
        match &mut self.state {
            SessionState::Editing {
                permission_tree, ..
            } => {
                *permission_tree = permission_tree.with_enabled(permission_id, enabled);

                Ok(())
            }
            SessionState::Submitting { .. } => Err(AssignmentStateError::SubmissionInFlight),
            other_state => Err(AssignmentStateError::InvalidState {
                operation: "toggle",
                current_state: other_state.kind(),
            }),
        }
    }

    /// Submits the current selection: collects the enabled permission IDs
    /// from the held tree and replaces the role's grant set with them.
    ///
    /// On success the session closes (returns to idle) and the tree is
    /// discarded. On failure the tree is retained unchanged and the
    /// session returns to editing, so the caller can retry without
    /// re-toggling anything.
    ///
    /// The submitted selection reflects every toggle applied before this
    /// call; a second `submit` while one is in flight is rejected without
    /// issuing another store call.
    pub async fn submit(&mut self) -> Result<(), AssignmentError<Store::Error>> {
        let current_state = mem::replace(&mut self.state, SessionState::Idle);

        let (role_id, permission_tree) = match current_state {
            SessionState::Editing {
                role_id,
                permission_tree,
            } => (role_id, permission_tree),
            SessionState::Submitting {
                role_id,
                permission_tree,
            } => {
                self.state = SessionState::Submitting {
                    role_id,
                    permission_tree,
                };

                return Err(AssignmentStateError::SubmissionInFlight.into());
            }
            other_state => {
                let other_state_kind = other_state.kind();
                self.state = other_state;

                return Err(AssignmentStateError::InvalidState {
                    operation: "submit",
                    current_state: other_state_kind,
                }
                .into());
            }
        };


        let enabled_permission_ids = permission_tree.enabled_permission_ids();

        // The tree is parked in the submitting state while the request is
        // in flight so that a failure can hand it back for a retry.
        self.state = SessionState::Submitting {
            role_id,
            permission_tree,
        };

        match self.store.replace_role_grants(role_id, enabled_permission_ids).await {
            Ok(()) => {
                self.state = SessionState::Idle;

                Ok(())
            }
            Err(error) => {
                let submitting_state = mem::replace(&mut self.state, SessionState::Idle);

                if let SessionState::Submitting {
                    role_id,
                    permission_tree,
                } = submitting_state
                {
                    self.state = SessionState::Editing {
                        role_id,
                        permission_tree,
                    };
                }

                Err(AssignmentError::Save { error })
            }
        }
    }

    /// Discards the held tree and returns the session to idle.
    /// Has no network effect. Valid while editing or loading.
    pub fn cancel(&mut self) -> Result<(), AssignmentStateError> {
        match &self.state {
            SessionState::Editing { .. } | SessionState::Loading => {
                self.state = SessionState::Idle;

                Ok(())
            }
            SessionState::Submitting { .. } => Err(AssignmentStateError::SubmissionInFlight),
            other_state => Err(AssignmentStateError::InvalidState {
                operation: "cancel",
                current_state: other_state.kind(),
            }),
        }
    }

    /// Marks an in-flight submission as failed and returns the session to
    /// editing, with the tree retained.
    ///
    /// For callers that imposed an external timeout on
    /// [`submit`][Self::submit] and dropped its future: dropping the
    /// future aborts the request, and its continuation never runs, so a
    /// late completion cannot change session state afterwards. Calling
    /// this acknowledges the timeout and makes the session editable again.
    pub fn fail_in_flight_submission(&mut self) -> Result<(), AssignmentStateError> {
        let current_state = mem::replace(&mut self.state, SessionState::Idle);

        match current_state {
            SessionState::Submitting {
                role_id,
                permission_tree,
            } => {
                self.state = SessionState::Editing {
                    role_id,
                    permission_tree,
                };

                Ok(())
            }
            other_state => {
                let other_state_kind = other_state.kind();
                self.state = other_state;

                Err(AssignmentStateError::InvalidState {
                    operation: "fail_in_flight_submission",
                    current_state: other_state_kind,
                })
            }
        }
    }
}


#[cfg(test)]
mod test {
    use std::cell::RefCell;
    use std::future::Future;
    use std::rc::Rc;
    use std::task::{Context, Poll};

    use grantdesk_core::permission_tree::PermissionTreeNode;
    use thiserror::Error;

    use super::*;


    #[derive(Debug, Error)]
    enum TestStoreError {
        #[error("simulated load failure")]
        LoadFailed,

        #[error("simulated save failure")]
        SaveFailed,
    }


    /// Shared record of every `replace_role_grants` call a test store received.
    #[derive(Clone, Default)]
    struct ReplaceCallLog {
        calls: Rc<RefCell<Vec<(RoleId, Vec<PermissionId>)>>>,
    }

    impl ReplaceCallLog {
        fn record(&self, role_id: RoleId, permission_ids: Vec<PermissionId>) {
            self.calls.borrow_mut().push((role_id, permission_ids));
        }

        fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }

        fn last_submitted_ids(&self) -> Vec<PermissionId> {
            self.calls.borrow().last().unwrap().1.clone()
        }
    }


    struct TestGrantStore {
        permission_tree: PermissionTree,
        fail_load: bool,
        fail_replace: bool,
        replace_call_log: ReplaceCallLog,
    }

    impl GrantStore for TestGrantStore {
        type Error = TestStoreError;

        async fn load_role_grants(&self, _role_id: RoleId) -> Result<PermissionTree, TestStoreError> {
            if self.fail_load {
                return Err(TestStoreError::LoadFailed);
            }

            Ok(self.permission_tree.clone())
        }

        async fn replace_role_grants(
            &self,
            role_id: RoleId,
            permission_ids: Vec<PermissionId>,
        ) -> Result<(), TestStoreError> {
            self.replace_call_log.record(role_id, permission_ids);

            if self.fail_replace {
                return Err(TestStoreError::SaveFailed);
            }

            Ok(())
        }
    }


    /// A store whose replace call records itself and then never completes,
    /// keeping the submission in flight for as long as the test wants.
    struct StalledGrantStore {
        permission_tree: PermissionTree,
        replace_call_log: ReplaceCallLog,
    }

    impl GrantStore for StalledGrantStore {
        type Error = TestStoreError;

        async fn load_role_grants(&self, _role_id: RoleId) -> Result<PermissionTree, TestStoreError> {
            Ok(self.permission_tree.clone())
        }

        async fn replace_role_grants(
            &self,
            role_id: RoleId,
            permission_ids: Vec<PermissionId>,
        ) -> Result<(), TestStoreError> {
            self.replace_call_log.record(role_id, permission_ids);

            std::future::pending::<Result<(), TestStoreError>>().await
        }
    }


    fn leaf(id: i32, enabled: bool) -> PermissionTreeNode {
        PermissionTreeNode {
            id: PermissionId::new(id),
            name: format!("permission-{}", id),
            enabled,
            icon: None,
            children: Vec::new(),
        }
    }

    fn branch(id: i32, enabled: bool, children: Vec<PermissionTreeNode>) -> PermissionTreeNode {
        PermissionTreeNode {
            id: PermissionId::new(id),
            name: format!("permission-{}", id),
            enabled,
            icon: None,
            children,
        }
    }

    fn sample_tree() -> PermissionTree {
        PermissionTree::from_roots(vec![
            branch(
                1,
                false,
                vec![
                    leaf(2, true),
                    branch(3, false, vec![leaf(4, false), leaf(5, true)]),
                ],
            ),
            branch(6, true, vec![leaf(7, false)]),
        ])
    }

    fn test_store(fail_load: bool, fail_replace: bool) -> (TestGrantStore, ReplaceCallLog) {
        let replace_call_log = ReplaceCallLog::default();

        let store = TestGrantStore {
            permission_tree: sample_tree(),
            fail_load,
            fail_replace,
            replace_call_log: replace_call_log.clone(),
        };

        (store, replace_call_log)
    }

    const TEST_ROLE_ID: RoleId = RoleId::new(7);


    #[tokio::test]
    async fn failed_open_surfaces_the_load_error_and_leaves_the_session_idle() {
        let (store, replace_call_log) = test_store(true, false);
        let mut session = AssignmentSession::new(store);

        let open_result = session.open(TEST_ROLE_ID).await;

        assert!(matches!(
            open_result,
            Err(AssignmentError::Load { .. })
        ));
        assert_eq!(session.state(), SessionStateKind::Idle);
        assert!(session.permission_tree().is_none());
        assert_eq!(replace_call_log.call_count(), 0);
    }

    #[tokio::test]
    async fn submit_sends_exactly_the_enabled_selection_and_closes_the_session() {
        let (store, replace_call_log) = test_store(false, false);
        let mut session = AssignmentSession::new(store);

        session.open(TEST_ROLE_ID).await.unwrap();
        assert_eq!(session.state(), SessionStateKind::Editing);

        session.toggle(PermissionId::new(4), true).unwrap();
        session.toggle(PermissionId::new(2), false).unwrap();

        session.submit().await.unwrap();

        assert_eq!(session.state(), SessionStateKind::Idle);
        assert!(session.permission_tree().is_none());

        assert_eq!(replace_call_log.call_count(), 1);
        // Initially enabled: 2, 5 and 6; the toggles enabled 4 and disabled 2.
        assert_eq!(
            replace_call_log.last_submitted_ids(),
            vec![
                PermissionId::new(4),
                PermissionId::new(5),
                PermissionId::new(6),
            ]
        );
    }

    #[tokio::test]
    async fn failed_submit_retains_the_edited_tree_and_returns_to_editing() {
        let (store, replace_call_log) = test_store(false, true);
        let mut session = AssignmentSession::new(store);

        session.open(TEST_ROLE_ID).await.unwrap();
        session.toggle(PermissionId::new(7), true).unwrap();

        let tree_before_submit = session.permission_tree().unwrap().clone();

        let submit_result = session.submit().await;

        assert!(matches!(
            submit_result,
            Err(AssignmentError::Save { .. })
        ));
        assert_eq!(session.state(), SessionStateKind::Editing);
        assert_eq!(
            session.permission_tree().unwrap(),
            &tree_before_submit,
            "a failed submit must not lose or duplicate any toggles"
        );
        assert_eq!(replace_call_log.call_count(), 1);

        // The caller can retry without re-toggling anything.
        let retry_result = session.submit().await;
        assert!(matches!(retry_result, Err(AssignmentError::Save { .. })));
        assert_eq!(replace_call_log.call_count(), 2);
    }

    #[tokio::test]
    async fn cancel_discards_the_tree_without_network_effect() {
        let (store, replace_call_log) = test_store(false, false);
        let mut session = AssignmentSession::new(store);

        session.open(TEST_ROLE_ID).await.unwrap();
        session.toggle(PermissionId::new(3), true).unwrap();

        session.cancel().unwrap();

        assert_eq!(session.state(), SessionStateKind::Idle);
        assert!(session.permission_tree().is_none());
        assert_eq!(replace_call_log.call_count(), 0);
    }

    #[tokio::test]
    async fn toggling_an_unknown_id_is_tolerated_and_keeps_the_session_editing() {
        let (store, _) = test_store(false, false);
        let mut session = AssignmentSession::new(store);

        session.open(TEST_ROLE_ID).await.unwrap();
        let tree_before_toggle = session.permission_tree().unwrap().clone();

        session.toggle(PermissionId::new(999), true).unwrap();

        assert_eq!(session.state(), SessionStateKind::Editing);
        assert_eq!(session.permission_tree().unwrap(), &tree_before_toggle);

        // Re-opening mid-session is a state error, not a load.
        let reopen_result = session.open(TEST_ROLE_ID).await;
        assert!(matches!(
            reopen_result,
            Err(AssignmentError::InvalidState(
                AssignmentStateError::InvalidState { .. }
            ))
        ));
        assert_eq!(session.state(), SessionStateKind::Editing);
    }

    #[test]
    fn operations_are_rejected_while_a_submission_is_in_flight() {
        let replace_call_log = ReplaceCallLog::default();

        let store = StalledGrantStore {
            permission_tree: sample_tree(),
            replace_call_log: replace_call_log.clone(),
        };

        let mut session = AssignmentSession::new(store);

        let waker = futures_util::task::noop_waker();
        let mut task_context = Context::from_waker(&waker);

        // Opening performs no pending awaits against this store,
        // so a single poll completes it.
        {
            let mut open_future = Box::pin(session.open(TEST_ROLE_ID));

            let Poll::Ready(open_result) = open_future.as_mut().poll(&mut task_context) else {
                panic!("open against the stalled store should complete immediately");
            };
            open_result.unwrap();
        }

        let tree_before_submit = session.permission_tree().unwrap().clone();

        // Drive a submission up to its in-flight await point, then drop the
        // future, simulating a caller-imposed timeout on the request.
        {
            let mut submit_future = Box::pin(session.submit());

            assert!(submit_future.as_mut().poll(&mut task_context).is_pending());
        }

        assert_eq!(session.state(), SessionStateKind::Submitting);
        assert_eq!(replace_call_log.call_count(), 1);

        // Toggles are rejected until the session leaves the submitting state.
        assert!(matches!(
            session.toggle(PermissionId::new(2), false),
            Err(AssignmentStateError::SubmissionInFlight)
        ));

        // A second submit is rejected without issuing another store call.
        {
            let mut second_submit_future = Box::pin(session.submit());

            let Poll::Ready(second_submit_result) =
                second_submit_future.as_mut().poll(&mut task_context)
            else {
                panic!("a rejected submit should complete immediately");
            };

            assert!(matches!(
                second_submit_result,
                Err(AssignmentError::InvalidState(
                    AssignmentStateError::SubmissionInFlight
                ))
            ));
        }

        assert_eq!(replace_call_log.call_count(), 1);

        // Acknowledging the timeout hands the tree back for editing.
        session.fail_in_flight_submission().unwrap();

        assert_eq!(session.state(), SessionStateKind::Editing);
        assert_eq!(session.permission_tree().unwrap(), &tree_before_submit);
    }
}
