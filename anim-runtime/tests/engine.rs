//! # 执行引擎集成测试
//!
//! 通过手动宿主控制每个属性动画的结束时机与结束方式，验证组合动作的
//! 执行顺序、完成语义与取消行为。

mod common;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use anim_runtime::{Action, Animator, PropertyChange, RunState, Vec2};
use common::ManualHost;

const VIEW: &str = "view";

fn mv(x: f32, y: f32, duration: f32) -> Action {
    Action::move_to(Vec2::new(x, y), duration).unwrap()
}

/// 返回一个完成计数器和对应的完成回调
fn counter() -> (Rc<Cell<usize>>, impl FnOnce() + 'static) {
    let count = Rc::new(Cell::new(0));
    let inner = Rc::clone(&count);
    (count, move || inner.set(inner.get() + 1))
}

#[test]
fn test_sequence_runs_children_in_order() {
    let host = ManualHost::new();
    let animator = Animator::new(host.clone());
    let (done, on_complete) = counter();

    let seq = Action::sequence([
        mv(100.0, 0.0, 1.0),
        mv(100.0, 50.0, 0.5),
        mv(0.0, 0.0, 0.25),
    ]);
    let handle = animator.run_with_completion(&seq, &VIEW, on_complete);

    // 每次只有一个子动作在进行
    assert_eq!(host.pending().len(), 1);
    host.finish_next();
    assert_eq!(host.pending().len(), 1);
    host.finish_next();
    assert_eq!(host.pending().len(), 1);
    assert_eq!(done.get(), 0);
    assert_eq!(handle.state(), RunState::Running);
    host.finish_next();

    assert_eq!(done.get(), 1);
    assert!(handle.is_completed());
    insta::assert_snapshot!(host.log().join("\n"), @r"
    animate#0 view position (100.0, 0.0) 1.00s
    animate#1 view position (100.0, 50.0) 0.50s
    animate#2 view position (0.0, 0.0) 0.25s
    ");
}

#[test]
fn test_run_state_lifecycle() {
    let host = ManualHost::new();
    let animator = Animator::new(host.clone());

    // 句柄从 Running 开始，Pending 只是默认值
    assert_eq!(RunState::default(), RunState::Pending);
    let handle = animator.run(&mv(1.0, 1.0, 1.0), &VIEW);
    assert_eq!(handle.state(), RunState::Running);

    let instant = animator.run(&Action::run_block(|| {}), &VIEW);
    assert_eq!(instant.state(), RunState::Completed);

    host.finish_next();
    assert_eq!(handle.state(), RunState::Completed);
}

#[test]
fn test_empty_combinators_complete_synchronously() {
    let host = ManualHost::new();
    let animator = Animator::new(host.clone());

    let (seq_done, on_seq) = counter();
    let handle = animator.run_with_completion(&Action::sequence([]), &VIEW, on_seq);
    assert_eq!(seq_done.get(), 1);
    assert!(handle.is_completed());

    let (group_done, on_group) = counter();
    animator.run_with_completion(&Action::group([]), &VIEW, on_group);
    assert_eq!(group_done.get(), 1);

    assert!(host.log().is_empty());
}

#[test]
fn test_repeat_zero_never_runs_child() {
    let host = ManualHost::new();
    let animator = Animator::new(host.clone());
    let (done, on_complete) = counter();

    let ran = Rc::new(Cell::new(false));
    let flag = Rc::clone(&ran);
    let child = Action::sequence([
        Action::run_block(move || flag.set(true)),
        mv(10.0, 10.0, 1.0),
    ]);
    animator.run_with_completion(&Action::repeat(child, 0).unwrap(), &VIEW, on_complete);

    assert_eq!(done.get(), 1);
    assert!(!ran.get());
    assert_eq!(host.animate_calls(), 0);
}

#[test]
fn test_repeat_runs_child_exactly_n_times_serially() {
    let host = ManualHost::new();
    let animator = Animator::new(host.clone());
    let (done, on_complete) = counter();

    let rep = Action::repeat(Action::move_by(Vec2::new(1.0, 0.0), 0.5).unwrap(), 3).unwrap();
    animator.run_with_completion(&rep, &VIEW, on_complete);

    for iteration in 1..=3 {
        // 上一次完成之前不会开始下一次
        assert_eq!(host.pending().len(), 1);
        assert_eq!(host.animate_calls(), iteration);
        host.finish_next();
    }

    assert_eq!(done.get(), 1);
    assert!(host.pending().is_empty());
    assert_eq!(host.target(VIEW).position, Vec2::new(3.0, 0.0));
}

#[test]
fn test_repeat_forever_keeps_going() {
    let host = ManualHost::new();
    let animator = Animator::new(host.clone());
    let (done, on_complete) = counter();

    let rep = Action::repeat_forever(mv(5.0, 5.0, 1.0));
    animator.run_with_completion(&rep, &VIEW, on_complete);

    for _ in 0..50 {
        host.finish_next();
    }
    assert_eq!(host.pending().len(), 1);
    assert_eq!(host.animate_calls(), 51);
    assert_eq!(done.get(), 0);
}

#[test]
fn test_group_completes_once_after_last_child_in_any_order() {
    let host = ManualHost::new();
    let animator = Animator::new(host.clone());
    let (done, on_complete) = counter();

    let group = Action::group([
        mv(10.0, 0.0, 1.0),
        Action::fade_to(0.5, 2.0).unwrap(),
    ]);
    animator.run_with_completion(&group, &VIEW, on_complete);

    // 子动作按列表顺序同时分发
    let pending = host.pending();
    assert_eq!(pending.len(), 2);

    // 反向结束
    host.finish(pending[1]);
    assert_eq!(done.get(), 0);
    host.finish(pending[0]);
    assert_eq!(done.get(), 1);
}

#[test]
fn test_group_of_sequences_joins_on_the_slowest_branch() {
    let host = ManualHost::new();
    let animator = Animator::new(host.clone());
    let (done, on_complete) = counter();

    let group = Action::group([
        Action::sequence([mv(1.0, 0.0, 0.1), mv(2.0, 0.0, 0.1), mv(3.0, 0.0, 0.1)]),
        Action::sequence([Action::rotate_to(45.0, 0.5).unwrap()]),
    ]);
    animator.run_with_completion(&group, &VIEW, on_complete);

    assert_eq!(host.finish_all(), 4);
    assert_eq!(done.get(), 1);
}

#[test]
fn test_move_by_is_relative_to_position_at_execution_time() {
    let host = ManualHost::new();
    let animator = Animator::new(host.clone());

    // 构建时的位置与结果无关
    let action = Action::move_by(Vec2::new(5.0, -3.0), 1.0).unwrap();
    host.set_position(VIEW, Vec2::new(10.0, 10.0));
    animator.run(&action, &VIEW);

    assert_eq!(
        host.pending_changes(),
        vec![(PropertyChange::Position(Vec2::new(15.0, 7.0)), 1.0)]
    );
}

#[test]
fn test_move_to_ignores_start_position() {
    let host = ManualHost::new();
    let animator = Animator::new(host.clone());
    host.set_position(VIEW, Vec2::new(-40.0, 99.0));

    animator.run(&mv(12.0, 34.0, 0.3), &VIEW);

    assert_eq!(
        host.pending_changes(),
        vec![(PropertyChange::Position(Vec2::new(12.0, 34.0)), 0.3)]
    );
}

#[test]
fn test_rotation_is_converted_to_radians_at_execution() {
    let host = ManualHost::auto();
    let animator = Animator::new(host.clone());

    animator.run(
        &Action::sequence([
            Action::rotate_to(90.0, 0.5).unwrap(),
            Action::rotate_by(-45.0, 0.5).unwrap(),
        ]),
        &VIEW,
    );

    let rotation = host.target(VIEW).rotation;
    assert!((rotation - std::f32::consts::FRAC_PI_4).abs() < 1e-6);
}

#[test]
fn test_fade_by_adds_to_current_alpha() {
    let host = ManualHost::auto();
    let animator = Animator::new(host.clone());

    animator.run(
        &Action::sequence([
            Action::fade_out(0.2).unwrap(),
            Action::fade_by(0.25, 0.2).unwrap(),
            Action::fade_by(0.25, 0.2).unwrap(),
        ]),
        &VIEW,
    );

    assert_eq!(host.target(VIEW).alpha, 0.5);
}

#[test]
fn test_run_block_and_remove_from_superview_are_synchronous() {
    let host = ManualHost::new();
    let animator = Animator::new(host.clone());
    let order = Rc::new(RefCell::new(Vec::new()));

    let first = Rc::clone(&order);
    let second = Rc::clone(&order);
    let action = Action::sequence([
        Action::run_block(move || first.borrow_mut().push("first")),
        Action::remove_from_superview(),
        Action::run_block(move || second.borrow_mut().push("second")),
    ]);

    let end = Rc::clone(&order);
    let on_complete = move || end.borrow_mut().push("done");
    let handle = animator.run_with_completion(&action, &VIEW, on_complete);

    assert!(handle.is_completed());
    assert_eq!(*order.borrow(), vec!["first", "second", "done"]);
    assert!(!host.target(VIEW).attached);
}

#[test]
fn test_wait_uses_host_timer() {
    let host = ManualHost::new();
    let animator = Animator::new(host.clone());
    let (done, on_complete) = counter();

    animator.run_with_completion(
        &Action::sequence([Action::wait(2.0).unwrap(), mv(1.0, 1.0, 1.0)]),
        &VIEW,
        on_complete,
    );

    assert_eq!(host.pending_timers(), 1);
    assert_eq!(host.animate_calls(), 0);

    host.fire_timers();
    assert_eq!(host.animate_calls(), 1);
    host.finish_next();
    assert_eq!(done.get(), 1);
}

#[test]
fn test_wait_without_completion_still_arms_timer() {
    let host = ManualHost::new();
    let animator = Animator::new(host.clone());

    let handle = animator.run(&Action::wait(1.0).unwrap(), &VIEW);
    assert_eq!(host.pending_timers(), 1);

    host.fire_timers();
    assert!(handle.is_completed());
    assert_eq!(host.pending_timers(), 0);
}

#[test]
fn test_interrupted_animation_drops_completion_chain() {
    let host = ManualHost::new();
    let animator = Animator::new(host.clone());

    // 序列
    let (seq_done, on_seq) = counter();
    let seq = animator.run_with_completion(
        &Action::sequence([mv(1.0, 0.0, 1.0), mv(2.0, 0.0, 1.0)]),
        &VIEW,
        on_seq,
    );
    host.interrupt(host.pending()[0]);
    assert!(host.pending().is_empty());
    assert_eq!(seq_done.get(), 0);
    assert_eq!(seq.state(), RunState::Running);

    // 并行：另一个分支正常结束也不会触发完成
    let (group_done, on_group) = counter();
    animator.run_with_completion(
        &Action::group([mv(1.0, 0.0, 1.0), Action::fade_in(1.0).unwrap()]),
        &VIEW,
        on_group,
    );
    let pending = host.pending();
    host.interrupt(pending[0]);
    host.finish(pending[1]);
    assert_eq!(group_done.get(), 0);

    // 重复
    let (rep_done, on_rep) = counter();
    animator.run_with_completion(
        &Action::repeat(mv(1.0, 1.0, 0.5), 3).unwrap(),
        &VIEW,
        on_rep,
    );
    host.finish_next();
    host.interrupt(host.pending()[0]);
    assert!(host.pending().is_empty());
    assert_eq!(rep_done.get(), 0);
}

#[test]
fn test_remove_all_orphans_running_sequence() {
    let host = ManualHost::new();
    let animator = Animator::new(host.clone());
    let (done, on_complete) = counter();

    let handle = animator.run_with_completion(
        &Action::repeat_forever(Action::sequence([mv(1.0, 0.0, 1.0), mv(0.0, 0.0, 1.0)])),
        &VIEW,
        on_complete,
    );
    host.finish_next();
    animator.remove_all(&VIEW);

    assert!(host.pending().is_empty());
    assert_eq!(done.get(), 0);
    assert_eq!(handle.state(), RunState::Running);
    let log = host.log();
    assert_eq!(log.last().map(String::as_str), Some("remove_all view"));
}

#[test]
fn test_shake_emits_legs_and_snaps_back_to_center() {
    let host = ManualHost::auto();
    let animator = Animator::new(host.clone());
    let center = Vec2::new(10.0, 10.0);
    host.set_position(VIEW, center);

    let shake = Action::shake_seeded(Vec2::new(10.0, 10.0), 40.0, 1.0, 3).unwrap();
    let (done, on_complete) = counter();
    animator.run_with_completion(&shake, &VIEW, on_complete);

    assert_eq!(done.get(), 1);
    assert_eq!(host.animate_calls(), 41);
    assert_eq!(host.target(VIEW).position, center);

    let log = host.log();
    assert!(log[..40].iter().all(|line| line.ends_with(" 0.03s")));
    assert_eq!(log[40], "animate#40 view position (10.0, 10.0) 0.00s");
}

#[test]
fn test_follow_points_resolves_each_leg_from_current_position() {
    let host = ManualHost::new();
    let animator = Animator::new(host.clone());
    let (done, on_complete) = counter();

    let path = Action::follow_points([Vec2::new(30.0, 40.0), Vec2::new(30.0, 0.0)], 10.0).unwrap();
    animator.run_with_completion(&path, &VIEW, on_complete);

    // (0,0) -> (30,40)：距离 50，速度 10 => 5 秒
    assert_eq!(
        host.pending_changes(),
        vec![(PropertyChange::Position(Vec2::new(30.0, 40.0)), 5.0)]
    );
    host.finish_next();

    // (30,40) -> (30,0)：距离 40 => 4 秒
    assert_eq!(
        host.pending_changes(),
        vec![(PropertyChange::Position(Vec2::new(30.0, 0.0)), 4.0)]
    );
    host.finish_next();
    assert_eq!(done.get(), 1);
}

#[test]
fn test_follow_points_empty_completes_immediately() {
    let host = ManualHost::new();
    let animator = Animator::new(host.clone());
    let handle = animator.run(&Action::follow_points([], 10.0).unwrap(), &VIEW);
    assert!(handle.is_completed());
    assert_eq!(host.animate_calls(), 0);
}

#[test]
fn test_same_action_runs_independently_on_two_targets() {
    let host = ManualHost::new();
    let animator = Animator::new(host.clone());
    let seq = Action::sequence([
        Action::move_by(Vec2::new(1.0, 0.0), 1.0).unwrap(),
        Action::move_by(Vec2::new(0.0, 1.0), 1.0).unwrap(),
    ]);

    let (a_done, on_a) = counter();
    let (b_done, on_b) = counter();
    animator.run_with_completion(&seq, &"a", on_a);
    animator.run_with_completion(&seq, &"b", on_b);

    let pending = host.pending();
    assert_eq!(pending.len(), 2);

    // 只推进 b
    host.finish(pending[1]);
    let next_b = host.pending()[1];
    host.finish(next_b);
    assert_eq!(b_done.get(), 1);
    assert_eq!(a_done.get(), 0);
    assert_eq!(host.target("b").position, Vec2::new(1.0, 1.0));

    host.finish_all();
    assert_eq!(a_done.get(), 1);
    assert_eq!(host.target("a").position, Vec2::new(1.0, 1.0));
}

#[test]
fn test_deep_synchronous_chains_do_not_grow_the_stack() {
    let host = ManualHost::auto();
    let animator = Animator::new(host.clone());
    let hits = Rc::new(Cell::new(0_u32));

    let counter_hits = Rc::clone(&hits);
    let block = Action::run_block(move || counter_hits.set(counter_hits.get() + 1));
    let nested = Action::repeat(Action::sequence([block, mv(1.0, 1.0, 0.0)]), 200_000).unwrap();

    let handle = animator.run(&nested, &VIEW);
    assert!(handle.is_completed());
    assert_eq!(hits.get(), 200_000);
}

#[test]
fn test_declared_duration_matches_sum_of_issued_durations() {
    let host = ManualHost::auto();
    let animator = Animator::new(host.clone());

    let action = Action::sequence([
        mv(1.0, 0.0, 0.5),
        Action::group([mv(2.0, 0.0, 1.0), Action::fade_out(0.25).unwrap()]),
        Action::repeat(Action::rotate_by(10.0, 0.2).unwrap(), 3).unwrap(),
    ]);
    assert!((action.duration() - 2.1).abs() < 1e-5);

    animator.run(&action, &VIEW);
    assert_eq!(host.animate_calls(), 6);
}
