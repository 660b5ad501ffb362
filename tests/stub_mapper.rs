use std::{
    panic::{self, AssertUnwindSafe},
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
};

use decoy::{
    args,
    matcher::{self, MethodMatcher},
    Answer, AnswerCollection, Arguments, Matcher, Reference, Slot, StubMapper,
};

/// Matcher with a fixed verdict that counts how often it was asked.
struct Fixed {
    method: &'static str,
    verdict: bool,
    evaluated: Arc<AtomicUsize>,
}

impl Fixed {
    fn new(method: &'static str, verdict: bool) -> Self {
        Fixed {
            method,
            verdict,
            evaluated: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl Matcher for Fixed {
    fn method(&self) -> &str {
        self.method
    }

    fn matches(&self, _: &str, _: &Arguments) -> bool {
        self.evaluated.fetch_add(1, Ordering::SeqCst);
        self.verdict
    }
}

/// Matcher that must never be evaluated.
struct Untouchable(&'static str);

impl Matcher for Untouchable {
    fn method(&self) -> &str {
        self.0
    }

    fn matches(&self, method: &str, arguments: &Arguments) -> bool {
        panic!("evaluated for {}({:?})", method, arguments)
    }
}

fn answers() -> Arc<AnswerCollection> {
    Arc::new(AnswerCollection::new(Answer::Nothing))
}

#[test]
fn empty_mapper_never_resolves() {
    let mapper = StubMapper::new();
    assert!(mapper.is_empty());
    assert!(mapper.resolve("foo", &mut args!["bar", "test"]).is_none());
    assert!(mapper.resolve("foo", &mut args![]).is_none());
}

#[test]
fn resolves_matching_stub() {
    let mapper = StubMapper::new();
    let stub = answers();
    mapper.register(
        stub.clone(),
        MethodMatcher::new("foo", (matcher::eq("bar"), matcher::eq("test"))),
    );

    let found = mapper.resolve("foo", &mut args!["bar", "test"]);
    assert!(Arc::ptr_eq(&found.unwrap(), &stub));

    assert!(mapper.resolve("foo", &mut args!["other"]).is_none());
}

#[test]
fn non_matching_predicate_never_resolves() {
    let mapper = StubMapper::new();
    let matcher = Fixed::new("foo", false);
    let evaluated = matcher.evaluated.clone();
    mapper.register(answers(), matcher);

    assert!(mapper.resolve("foo", &mut args!["bar", "test"]).is_none());
    assert_eq!(evaluated.load(Ordering::SeqCst), 1);
}

#[test]
fn unknown_method_never_resolves() {
    let mapper = StubMapper::new();
    mapper.register(answers(), MethodMatcher::any_parameters("foo"));
    mapper.register(answers(), MethodMatcher::any_parameters("baz"));

    assert!(mapper.resolve("bar", &mut args!["bar", "test"]).is_none());
}

#[test]
fn other_methods_are_not_evaluated() {
    let mapper = StubMapper::new();
    let stub = answers();
    mapper.register(stub.clone(), MethodMatcher::any_parameters("bar"));
    mapper.register(answers(), Untouchable("foo"));

    let found = mapper.resolve("bar", &mut args![1, 2, 3]);
    assert!(Arc::ptr_eq(&found.unwrap(), &stub));
}

#[test]
fn most_recent_stub_wins() {
    let mapper = StubMapper::new();
    let older = answers();
    let newer = answers();

    mapper.register(older, Untouchable("foo"));
    mapper.register(newer.clone(), Fixed::new("foo", true));

    let found = mapper.resolve("foo", &mut args!["bar", "test"]);
    assert!(Arc::ptr_eq(&found.unwrap(), &newer));
}

#[test]
fn specific_stub_overrides_general_one() {
    let mapper = StubMapper::new();
    let general = answers();
    let specific = answers();

    mapper.register(general.clone(), MethodMatcher::any_parameters("foo"));
    mapper.register(
        specific.clone(),
        MethodMatcher::new("foo", (matcher::eq("bar"), matcher::eq("test"))),
    );

    let found = mapper.resolve("foo", &mut args!["bar", "test"]);
    assert!(Arc::ptr_eq(&found.unwrap(), &specific));

    let found = mapper.resolve("foo", &mut args!["bar"]);
    assert!(Arc::ptr_eq(&found.unwrap(), &general));
}

#[test]
fn duplicate_stubs_shadow_older_ones() {
    let mapper = StubMapper::new();
    let stubs: Vec<_> = (0..3).map(|_| answers()).collect();
    for stub in &stubs {
        mapper.register(stub.clone(), MethodMatcher::new("foo", (matcher::eq(1),)));
    }

    assert_eq!(mapper.len(), 3);
    for _ in 0..3 {
        let found = mapper.resolve("foo", &mut args![1]);
        assert!(Arc::ptr_eq(&found.unwrap(), &stubs[2]));
    }
}

#[test]
fn clear_removes_every_stub() {
    let mapper = StubMapper::new();
    mapper.register(answers(), Untouchable("foo"));

    mapper.clear();

    assert!(mapper.is_empty());
    assert!(mapper.resolve("foo", &mut args!["bar", "test"]).is_none());
}

#[test]
fn clear_leaves_answers_intact() {
    let mapper = StubMapper::new();
    let stub = Arc::new(AnswerCollection::new(Answer::returning(1)));
    stub.push(Answer::returning(2));
    mapper.register(stub.clone(), MethodMatcher::any_parameters("foo"));

    mapper.clear();

    assert_eq!(stub.len(), 2);
    assert!(stub.has_answer());
}

#[test]
fn registering_after_clear_works() {
    let mapper = StubMapper::new();
    mapper.register(answers(), MethodMatcher::any_parameters("foo"));
    mapper.clear();

    let stub = answers();
    mapper.register(stub.clone(), MethodMatcher::any_parameters("foo"));

    let found = mapper.resolve("foo", &mut args![]);
    assert!(Arc::ptr_eq(&found.unwrap(), &stub));
}

#[test]
fn resolution_writes_reference() {
    let mapper = StubMapper::new();
    let stub = answers();
    mapper.register(
        stub.clone(),
        MethodMatcher::new("method", (matcher::set_reference(42),)),
    );

    let value = Reference::new("blah");
    let mut arguments = [Slot::reference(&value)];

    let found = mapper.resolve("method", &mut arguments);
    assert!(Arc::ptr_eq(&found.unwrap(), &stub));
    assert_eq!(value.get::<i32>(), Some(42));
}

#[test]
fn shadowed_setter_does_not_write() {
    let mapper = StubMapper::new();
    mapper.register(
        answers(),
        MethodMatcher::new("method", (matcher::set_reference(42),)),
    );
    mapper.register(answers(), MethodMatcher::any_parameters("method"));

    let value = Reference::new("blah");
    mapper.resolve("method", &mut [Slot::reference(&value)]);

    assert_eq!(value.get::<&str>(), Some("blah"));
}

#[test]
fn failed_resolution_does_not_write() {
    let mapper = StubMapper::new();
    mapper.register(
        answers(),
        MethodMatcher::new("method", (matcher::set_reference(42), matcher::eq(1))),
    );

    let value = Reference::new("blah");
    assert!(mapper
        .resolve("method", &mut [Slot::reference(&value), Slot::value(2)])
        .is_none());

    assert_eq!(value.get::<&str>(), Some("blah"));
}

#[test]
fn guarded_setter_writes_only_when_guard_matches() {
    let mapper = StubMapper::new();
    let stub = answers();
    mapper.register(
        stub.clone(),
        MethodMatcher::new(
            "method",
            (matcher::set_reference(42).when(matcher::eq("blah")),),
        ),
    );

    let value = Reference::new("other");
    assert!(mapper
        .resolve("method", &mut [Slot::reference(&value)])
        .is_none());
    assert_eq!(value.get::<&str>(), Some("other"));

    let value = Reference::new("blah");
    let found = mapper.resolve("method", &mut [Slot::reference(&value)]);
    assert!(Arc::ptr_eq(&found.unwrap(), &stub));
    assert_eq!(value.get::<i32>(), Some(42));
}

#[test]
fn argument_matcher_may_read_its_own_reference() {
    let mapper = StubMapper::new();
    let out = Reference::new(1);
    let seen = out.clone();
    let stub = answers();
    mapper.register(
        stub.clone(),
        MethodMatcher::new(
            "method",
            (matcher::from_fn(
                move |_: &i32| seen.get::<i32>() == Some(1),
                "cell holds 1",
            ),),
        ),
    );

    let found = mapper.resolve("method", &mut [Slot::reference(&out)]);
    assert!(Arc::ptr_eq(&found.unwrap(), &stub));
}

#[test]
fn mutations_apply_once_per_resolution() {
    struct CountingSetter(Arc<AtomicUsize>);

    impl Matcher for CountingSetter {
        fn method(&self) -> &str {
            "method"
        }

        fn matches(&self, _: &str, _: &Arguments) -> bool {
            true
        }

        fn apply_mutations(&self, arguments: &mut Arguments) {
            let count = self.0.fetch_add(1, Ordering::SeqCst) + 1;
            arguments[0].set_value(Box::new(count));
        }
    }

    let mapper = StubMapper::new();
    let count = Arc::new(AtomicUsize::new(0));
    mapper.register(answers(), CountingSetter(count.clone()));

    let mut arguments = args![0_usize];
    mapper.resolve("method", &mut arguments);
    assert_eq!(arguments[0].get::<usize>(), Some(1));

    mapper.resolve("method", &mut arguments);
    assert_eq!(count.load(Ordering::SeqCst), 2);
    assert_eq!(arguments[0].get::<usize>(), Some(2));
}

#[test]
fn matcher_may_reenter_mapper() {
    struct Reentrant {
        mapper: Arc<StubMapper>,
    }

    impl Matcher for Reentrant {
        fn method(&self) -> &str {
            "outer"
        }

        fn matches(&self, _: &str, _: &Arguments) -> bool {
            self.mapper.resolve("inner", &mut args![]).is_some()
        }
    }

    let mapper = Arc::new(StubMapper::new());
    let outer = answers();
    mapper.register(
        outer.clone(),
        Reentrant {
            mapper: mapper.clone(),
        },
    );

    // inner is not stubbed yet
    assert!(mapper.resolve("outer", &mut args![]).is_none());

    mapper.register(answers(), MethodMatcher::any_parameters("inner"));
    let found = mapper.resolve("outer", &mut args![]);
    assert!(Arc::ptr_eq(&found.unwrap(), &outer));

    // break the cycle between the mapper and its matcher
    mapper.clear();
}

#[test]
fn mutation_step_may_register_and_resolve() {
    struct Registering {
        mapper: Arc<StubMapper>,
        inner_found: Arc<AtomicBool>,
    }

    impl Matcher for Registering {
        fn method(&self) -> &str {
            "outer"
        }

        fn matches(&self, _: &str, _: &Arguments) -> bool {
            true
        }

        fn apply_mutations(&self, _: &mut Arguments) {
            self.mapper
                .register(answers(), MethodMatcher::any_parameters("inner"));
            let found = self.mapper.resolve("inner", &mut args![]).is_some();
            self.inner_found.store(found, Ordering::SeqCst);
        }
    }

    let mapper = Arc::new(StubMapper::new());
    let inner_found = Arc::new(AtomicBool::new(false));
    let outer = answers();
    mapper.register(
        outer.clone(),
        Registering {
            mapper: mapper.clone(),
            inner_found: inner_found.clone(),
        },
    );

    let found = mapper.resolve("outer", &mut args![]);
    assert!(Arc::ptr_eq(&found.unwrap(), &outer));
    assert!(inner_found.load(Ordering::SeqCst));
    assert_eq!(mapper.len(), 2);

    // break the cycle between the mapper and its matcher
    mapper.clear();
}

#[test]
#[should_panic(expected = "evaluated for")]
fn panicking_matcher_propagates() {
    let mapper = StubMapper::new();
    mapper.register(answers(), Untouchable("foo"));
    mapper.resolve("foo", &mut args![]);
}

#[test]
fn mapper_is_usable_after_matcher_panic() {
    let mapper = Arc::new(StubMapper::new());
    mapper.register(answers(), Untouchable("foo"));

    let shared = mapper.clone();
    let result = panic::catch_unwind(AssertUnwindSafe(move || {
        shared.resolve("foo", &mut args![]);
    }));
    assert!(result.is_err());

    let stub = answers();
    mapper.register(stub.clone(), MethodMatcher::any_parameters("bar"));
    let found = mapper.resolve("bar", &mut args![]);
    assert!(Arc::ptr_eq(&found.unwrap(), &stub));
}

#[test]
fn shared_matchers_can_be_registered_twice() {
    let mapper = StubMapper::new();
    let shared = Arc::new(Fixed::new("foo", true));
    let first = answers();
    let second = answers();

    mapper.register(first, shared.clone());
    mapper.register(second.clone(), shared.clone());

    let found = mapper.resolve("foo", &mut args![]);
    assert!(Arc::ptr_eq(&found.unwrap(), &second));
    assert_eq!(shared.evaluated.load(Ordering::SeqCst), 1);
}

#[test]
fn expectations_are_listed_most_recent_first() {
    let mapper = StubMapper::new();
    mapper.register(answers(), MethodMatcher::new("foo", (matcher::eq(1),)));
    mapper.register(answers(), MethodMatcher::any_parameters("bar"));
    mapper.register(answers(), MethodMatcher::new("foo", (matcher::any(),)));

    assert_eq!(mapper.expectations("foo"), vec!["foo(_)", "foo(1)"]);
    assert!(mapper.expectations("baz").is_empty());
}
