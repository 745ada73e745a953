#[macro_use]
mod common;

#[cfg(test)]
mod bool {
    tests! {
        equality:
        "print true == true; print true == false; print false == true; print false == false; \
         print true == 1; print false == 0; print true == \"true\"; print false == \"false\";"
        => OK "true", "false", "false", "true", "false", "false", "false", "false"
    }

    tests! {
        mismatched_types_are_simply_unequal:
        "print 1 == \"1\"; print nil == false; print true == nil;"
        => OK "false", "false", "false"
    }

    tests! {
        not:
        "print !true; print !false; print !!true;"
        => OK "false", "true", "true"
    }
}
