//! Static classification of the pspautotests suite
//!
//! Names are test paths relative to the test root, without extension.

use std::fmt;
use std::str::FromStr;

/// Regression tests: these have passed and must keep passing.
pub const GOOD: &[&str] = &[
    "cpu/cpu_alu/cpu_alu",
    "cpu/vfpu/vector",
    "cpu/vfpu/matrix",
    "cpu/vfpu/convert",
    "cpu/vfpu/prefixes",
    "cpu/vfpu/colors",
    "cpu/vfpu/gum",
    "cpu/icache/icache",
    "cpu/lsu/lsu",
    "cpu/fpu/fpu",
    "audio/atrac/ids",
    "audio/atrac/setdata",
    "audio/mp3/mp3test",
    "audio/sascore/sascore",
    "ctrl/ctrl",
    "ctrl/idle/idle",
    "ctrl/sampling/sampling",
    "ctrl/sampling2/sampling2",
    "display/display",
    "display/vblankmulti",
    "dmac/dmactest",
    "gpu/callbacks/ge_callbacks",
    "gpu/ge/edram",
    "gpu/ge/context",
    "gpu/ge/queue",
    "hash/hash",
    "hle/check_not_used_uids",
    "intr/intr",
    "intr/suspended",
    "intr/vblank/vblank",
    "io/cwd/cwd",
    "loader/bss/bss",
    "malloc/malloc",
    "misc/testgp",
    "misc/libc",
    "misc/deadbeef",
    "misc/dcache",
    "misc/timeconv",
    "mstick/mstick",
    "rtc/rtc",
    "string/string",
    "sysmem/freesize",
    "sysmem/sysmem",
    "threads/alarm/alarm",
    "threads/alarm/cancel/cancel",
    "threads/alarm/refer/refer",
    "threads/alarm/set/set",
    "threads/callbacks/callbacks",
    "threads/callbacks/check",
    "threads/callbacks/create",
    "threads/callbacks/delete",
    "threads/callbacks/refer",
    "threads/events/events",
    "threads/events/cancel/cancel",
    "threads/events/clear/clear",
    "threads/events/create/create",
    "threads/events/delete/delete",
    "threads/events/poll/poll",
    "threads/events/refer/refer",
    "threads/events/set/set",
    "threads/events/wait/wait",
    "threads/fpl/fpl",
    "threads/fpl/allocate",
    "threads/fpl/cancel",
    "threads/fpl/create",
    "threads/fpl/delete",
    "threads/fpl/free",
    "threads/fpl/priority",
    "threads/fpl/tryallocate",
    "threads/k0/k0",
    "threads/lwmutex/create",
    "threads/lwmutex/delete",
    "threads/lwmutex/lock",
    "threads/lwmutex/priority",
    "threads/lwmutex/refer",
    "threads/lwmutex/try",
    "threads/lwmutex/try600",
    "threads/lwmutex/unlock",
    "threads/mbx/mbx",
    "threads/mbx/cancel/cancel",
    "threads/mbx/create/create",
    "threads/mbx/delete/delete",
    "threads/mbx/poll/poll",
    "threads/mbx/priority/priority",
    "threads/mbx/receive/receive",
    "threads/mbx/refer/refer",
    "threads/mbx/send/send",
    "threads/msgpipe/msgpipe",
    "threads/msgpipe/cancel",
    "threads/msgpipe/create",
    "threads/msgpipe/data",
    "threads/msgpipe/delete",
    "threads/msgpipe/receive",
    "threads/msgpipe/refer",
    "threads/msgpipe/send",
    "threads/msgpipe/tryreceive",
    "threads/msgpipe/trysend",
    "threads/mutex/cancel",
    "threads/mutex/create",
    "threads/mutex/delete",
    "threads/mutex/lock",
    "threads/mutex/mutex",
    "threads/mutex/priority",
    "threads/mutex/refer",
    "threads/mutex/try",
    "threads/mutex/unlock",
    "threads/semaphores/semaphores",
    "threads/semaphores/cancel",
    "threads/semaphores/create",
    "threads/semaphores/delete",
    "threads/semaphores/poll",
    "threads/semaphores/priority",
    "threads/semaphores/refer",
    "threads/semaphores/signal",
    "threads/semaphores/wait",
    "threads/threads/change",
    "threads/threads/extend",
    "threads/threads/refer",
    "threads/threads/release",
    "threads/threads/rotate",
    "threads/threads/stackfree",
    "threads/threads/start",
    "threads/threads/suspend",
    "threads/threads/threadend",
    "threads/threads/threads",
    "threads/wakeup/wakeup",
    "threads/vpl/allocate",
    "threads/vpl/cancel",
    "threads/vpl/delete",
    "threads/vpl/free",
    "threads/vpl/priority",
    "threads/vpl/refer",
    "threads/vpl/try",
    "threads/vpl/vpl",
    "threads/vtimers/vtimer",
    "threads/vtimers/cancelhandler",
    "threads/vtimers/create",
    "threads/vtimers/delete",
    "threads/vtimers/getbase",
    "threads/vtimers/gettime",
    "threads/vtimers/interrupt",
    "threads/vtimers/refer",
    "threads/vtimers/settime",
    "threads/vtimers/start",
    "threads/vtimers/stop",
    "utility/savedata/autosave",
    "utility/savedata/filelist",
    "utility/savedata/makedata",
    "utility/systemparam/systemparam",
    "power/power",
    "power/volatile/lock",
    "power/volatile/trylock",
    "power/volatile/unlock",
    "umd/callbacks/umd",
    "umd/wait/wait",
    "io/directory/directory",
];

/// Next tests up for fixing. Run by default alongside [`GOOD`].
pub const NEXT: &[&str] = &[
    "cpu/cpu_alu/cpu_branch",
    "cpu/fpu/fcr",
    "audio/atrac/atractest",
    "audio/atrac/decode",
    "audio/atrac/resetting",
    "audio/sceaudio/datalen",
    "audio/sceaudio/output",
    "audio/sceaudio/reserve",
    "ctrl/vblank",
    "display/hcount",
    "intr/waits",
    "threads/callbacks/cancel",
    "threads/callbacks/count",
    "threads/callbacks/notify",
    "threads/scheduling/dispatch",
    "threads/scheduling/scheduling",
    "threads/threads/create",
    "threads/threads/terminate",
    "threads/vtimers/sethandler",
    "threads/vpl/create",
    "utility/savedata/getsize",
    "utility/savedata/idlist",
    "utility/savedata/sizes",
    "gpu/commands/basic",
    "gpu/commands/material",
    "gpu/complex/complex",
    "gpu/displaylist/state",
    "gpu/ge/get",
    "gpu/ge/break",
    "gpu/reflection/reflection",
    "gpu/rendertarget/rendertarget",
    "gpu/signals/jumps",
    "gpu/signals/simple",
    "gpu/simple/simple",
    "gpu/triangle/triangle",
    "font/fonttest",
    "io/file/file",
    "io/file/rename",
    "io/io/io",
    "io/iodrv/iodrv",
    "modules/loadexec/loader",
    "rtc/arithmetic",
    "rtc/convert",
    "rtc/lookup",
    "sysmem/partition",
    "umd/io/umd_io",
    "umd/raw_access/raw_access",
    "video/mpeg/basic",
    "video/pmf/pmf",
    "video/pmf_simple/pmf_simple",
    "video/psmfplayer/basic",
];

/// Tests that don't run (or don't run correctly) on real hardware.
pub const BROKEN: &[&str] = &[];

/// Tests that are skipped entirely (unimportant or impossible to run).
pub const IGNORED: &[&str] = &[
    "kirk/kirk",
    "me/me",
    "umd/umd",
];
/// One of the named classification lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestSet {
    Good,
    Next,
    Broken,
    Ignored,
}

impl TestSet {
    pub fn names(self) -> &'static [&'static str] {
        match self {
            TestSet::Good => GOOD,
            TestSet::Next => NEXT,
            TestSet::Broken => BROKEN,
            TestSet::Ignored => IGNORED,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TestSet::Good => "good",
            TestSet::Next => "next",
            TestSet::Broken => "broken",
            TestSet::Ignored => "ignored",
        }
    }
}

impl fmt::Display for TestSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestSet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "good" => Ok(TestSet::Good),
            "next" => Ok(TestSet::Next),
            "broken" => Ok(TestSet::Broken),
            "ignored" => Ok(TestSet::Ignored),
            other => Err(format!(
                "unknown test set '{}' (expected good, next, broken or ignored)",
                other
            )),
        }
    }
}

/// Tests to run when none were named on the command line.
///
/// Graphics mode only runs the regression set; otherwise the next set runs
/// first, followed by the regression set.
pub fn default_selection(graphics: bool) -> Vec<String> {
    let sets: &[TestSet] = if graphics {
        &[TestSet::Good]
    } else {
        &[TestSet::Next, TestSet::Good]
    };
    sets.iter()
        .flat_map(|set| set.names().iter().map(|name| name.to_string()))
        .collect()
}
